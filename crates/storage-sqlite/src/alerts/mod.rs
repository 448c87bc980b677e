//! SQLite storage implementation for health alerts.

mod model;
mod repository;

pub use model::HealthAlertDB;
pub use repository::AlertRepository;
