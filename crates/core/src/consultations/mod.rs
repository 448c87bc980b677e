//! Consultations module - patient bookings with doctors.

mod consultations_model;
mod consultations_service;
mod consultations_traits;

pub use consultations_model::{
    Consultation, ConsultationMode, ConsultationStatus, ConsultationView, NewConsultation,
    StatusChange,
};
pub use consultations_service::ConsultationService;
pub use consultations_traits::{ConsultationRepositoryTrait, ConsultationServiceTrait};
