//! SQLite storage implementation for medication stock and requests.

mod model;
mod repository;

pub use model::{MedicationDB, MedicationRequestDB};
pub use repository::MedicationRepository;
