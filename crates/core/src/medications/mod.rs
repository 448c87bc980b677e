//! Medications module - donated stock and patient requests for it.

mod medications_model;
mod medications_service;
mod medications_traits;

pub use medications_model::{
    FulfilledRequest, Medication, MedicationCategory, MedicationRequest, NewMedication,
    NewMedicationRequest, ProviderType, RequestStatus,
};
pub use medications_service::MedicationService;
pub use medications_traits::{MedicationRepositoryTrait, MedicationServiceTrait};
