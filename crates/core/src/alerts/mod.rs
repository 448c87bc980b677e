//! Alerts module - regional public health notices.

mod alerts_model;
mod alerts_service;
mod alerts_traits;

pub use alerts_model::{AlertSeverity, HealthAlert, NewHealthAlert};
pub use alerts_service::AlertService;
pub use alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
