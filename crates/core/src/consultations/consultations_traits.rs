//! Consultation repository and service traits.

use async_trait::async_trait;

use super::consultations_model::{
    Consultation, ConsultationStatus, ConsultationView, NewConsultation, StatusChange,
};
use crate::errors::Result;
use crate::users::Identity;

#[async_trait]
pub trait ConsultationRepositoryTrait: Send + Sync {
    async fn create(&self, consultation: Consultation) -> Result<Consultation>;

    /// The patient's bookings, each with the doctor's summary.
    fn list_for_patient(&self, patient_id: &str) -> Result<Vec<ConsultationView>>;

    /// The doctor's bookings, each with the patient's summary.
    fn list_for_doctor(&self, doctor_id: &str) -> Result<Vec<ConsultationView>>;

    /// Loads the booking, applies [`Consultation::change_status`] and saves it
    /// in one write transaction.
    async fn change_status(
        &self,
        consultation_id: &str,
        actor: Identity,
        status: ConsultationStatus,
    ) -> Result<Consultation>;
}

#[async_trait]
pub trait ConsultationServiceTrait: Send + Sync {
    async fn book(&self, patient: &Identity, new_consultation: NewConsultation)
        -> Result<Consultation>;

    /// Bookings where the caller is the patient or the doctor.
    fn list_mine(&self, caller: &Identity) -> Result<Vec<ConsultationView>>;

    async fn update_status(
        &self,
        caller: &Identity,
        consultation_id: &str,
        change: StatusChange,
    ) -> Result<Consultation>;
}
