//! SQLite storage implementation for medical missions.

mod model;
mod repository;

pub use model::{MedicalMissionDB, MissionRequestDB};
pub use repository::MissionRepository;
