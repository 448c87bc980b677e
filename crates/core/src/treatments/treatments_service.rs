use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use super::treatments_model::{NewTreatment, Treatment, TreatmentPublic};
use super::treatments_traits::{TreatmentRepositoryTrait, TreatmentServiceTrait};
use crate::errors::Result;

/// Service for opening and listing treatment campaigns
pub struct TreatmentService {
    repository: Arc<dyn TreatmentRepositoryTrait>,
}

impl TreatmentService {
    pub fn new(repository: Arc<dyn TreatmentRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl TreatmentServiceTrait for TreatmentService {
    async fn create_treatment(
        &self,
        patient_id: &str,
        new_treatment: NewTreatment,
    ) -> Result<Treatment> {
        let treatment = Treatment::create(patient_id, new_treatment, Utc::now().naive_utc())?;
        debug!(
            "Creating treatment for patient {} with goal {}",
            patient_id, treatment.goal_amount
        );

        let created = self.repository.create(treatment).await?;
        info!(
            "Treatment {} opened by patient {} (goal {})",
            created.id, created.patient_id, created.goal_amount
        );
        Ok(created)
    }

    fn list_public_treatments(&self) -> Result<Vec<TreatmentPublic>> {
        self.repository.list_public()
    }
}
