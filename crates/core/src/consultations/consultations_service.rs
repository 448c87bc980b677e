use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use super::consultations_model::{Consultation, ConsultationView, NewConsultation, StatusChange};
use super::consultations_traits::{ConsultationRepositoryTrait, ConsultationServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::users::{Identity, Role, UserRepositoryTrait};
use crate::utils::required_text;

/// Books consultations and moves them through their lifecycle
pub struct ConsultationService {
    repository: Arc<dyn ConsultationRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
}

impl ConsultationService {
    pub fn new(
        repository: Arc<dyn ConsultationRepositoryTrait>,
        users: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self { repository, users }
    }
}

#[async_trait::async_trait]
impl ConsultationServiceTrait for ConsultationService {
    async fn book(
        &self,
        patient: &Identity,
        new_consultation: NewConsultation,
    ) -> Result<Consultation> {
        let now = Utc::now().naive_utc();
        new_consultation.validate(now)?;

        let doctor_id = required_text(new_consultation.doctor_id.as_deref(), "doctor_id")?;
        let doctor = self
            .users
            .get_by_id(doctor_id)?
            .filter(|u| u.role == Role::Doctor)
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!("'{}' is not a valid doctor", doctor_id))
            })?;
        let profile = self.users.get_by_id(&patient.user_id)?;

        let consultation = Consultation::book(
            &patient.user_id,
            profile.as_ref(),
            &doctor,
            new_consultation,
            now,
        )?;
        debug!(
            "Booking consultation for patient {} with doctor {} at {}",
            consultation.patient_id, consultation.doctor_id, consultation.scheduled_at
        );

        let created = self.repository.create(consultation).await?;
        info!(
            "Consultation {} booked (translation needed: {})",
            created.id, created.needs_translation
        );
        Ok(created)
    }

    fn list_mine(&self, caller: &Identity) -> Result<Vec<ConsultationView>> {
        match caller.role {
            Role::Patient => self.repository.list_for_patient(&caller.user_id),
            Role::Doctor => self.repository.list_for_doctor(&caller.user_id),
            other => Err(Error::permission_denied(format!(
                "{} accounts have no consultations",
                other
            ))),
        }
    }

    async fn update_status(
        &self,
        caller: &Identity,
        consultation_id: &str,
        change: StatusChange,
    ) -> Result<Consultation> {
        let status = change
            .status
            .ok_or_else(|| ValidationError::MissingField("status".to_string()))?;

        let updated = self
            .repository
            .change_status(consultation_id, caller.clone(), status)
            .await?;
        info!(
            "Consultation {} is now {} (by {} {})",
            updated.id, updated.status, caller.role, caller.user_id
        );
        Ok(updated)
    }
}
