use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use super::medications_model::{
    FulfilledRequest, Medication, MedicationRequest, NewMedication, NewMedicationRequest,
};
use super::medications_traits::{MedicationRepositoryTrait, MedicationServiceTrait};
use crate::errors::{Error, Result};
use crate::users::{Identity, Role};

/// Service for medication stock and the requests made against it
pub struct MedicationService {
    repository: Arc<dyn MedicationRepositoryTrait>,
}

impl MedicationService {
    pub fn new(repository: Arc<dyn MedicationRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl MedicationServiceTrait for MedicationService {
    fn list_available(&self) -> Result<Vec<Medication>> {
        self.repository.list_available()
    }

    async fn offer_item(
        &self,
        provider: &Identity,
        new_medication: NewMedication,
    ) -> Result<Medication> {
        let medication = Medication::offer(provider, new_medication, Utc::now().naive_utc())?;
        debug!(
            "Listing {} x {} from {} {}",
            medication.quantity,
            medication.name,
            medication.provider_type.as_str(),
            medication.provider_id
        );

        let created = self.repository.create(medication).await?;
        info!("Medication {} listed ({} units)", created.id, created.quantity);
        Ok(created)
    }

    async fn request_item(
        &self,
        requester: &Identity,
        new_request: NewMedicationRequest,
    ) -> Result<MedicationRequest> {
        new_request.validate()?;
        let request = self
            .repository
            .open_request(&requester.user_id, new_request)
            .await?;
        info!(
            "Medication request {} opened for item {}",
            request.id, request.medication_id
        );
        Ok(request)
    }

    async fn fulfil_request(
        &self,
        caller: &Identity,
        request_id: &str,
    ) -> Result<FulfilledRequest> {
        if !matches!(caller.role, Role::Ngo | Role::Admin) {
            return Err(Error::permission_denied(
                "Only NGOs and admins fulfil requests",
            ));
        }

        let fulfilled = self.repository.fulfil_request(request_id).await?;
        info!(
            "Medication request {} fulfilled by {} ({} units of {} left)",
            fulfilled.request.id,
            caller.user_id,
            fulfilled.medication.quantity,
            fulfilled.medication.id
        );
        Ok(fulfilled)
    }
}
