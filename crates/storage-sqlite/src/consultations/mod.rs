//! SQLite storage implementation for consultations.

mod model;
mod repository;

pub use model::ConsultationDB;
pub use repository::ConsultationRepository;
