//! Treatments module - the funding campaign aggregate, its service and traits.

mod treatments_model;
mod treatments_service;
mod treatments_traits;


pub use treatments_model::{
    NewTreatment, PatientSummary, Treatment, TreatmentCategory, TreatmentPublic, TreatmentStatus,
};
pub use treatments_service::TreatmentService;
pub use treatments_traits::{TreatmentRepositoryTrait, TreatmentServiceTrait};
