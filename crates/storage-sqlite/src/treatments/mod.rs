//! SQLite storage implementation for treatments.

mod model;
mod repository;

pub use model::TreatmentDB;
pub use repository::TreatmentRepository;

pub(crate) use repository::find_treatment;
