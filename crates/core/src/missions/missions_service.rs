use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::missions_model::{MedicalMission, MissionRequest, NewMission, NewMissionRequest};
use super::missions_traits::{MissionRepositoryTrait, MissionServiceTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::users::{Identity, Role};
use crate::utils::optional_text;

/// Service for NGO medical missions and patient sign-ups
pub struct MissionService {
    repository: Arc<dyn MissionRepositoryTrait>,
}

impl MissionService {
    pub fn new(repository: Arc<dyn MissionRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl MissionServiceTrait for MissionService {
    fn list_missions(&self, location: Option<&str>) -> Result<Vec<MedicalMission>> {
        let location = optional_text(location);
        self.repository.list_upcoming(location.as_deref())
    }

    async fn create_mission(
        &self,
        ngo: &Identity,
        new_mission: NewMission,
    ) -> Result<MedicalMission> {
        if !ngo.has_role(Role::Ngo) {
            return Err(Error::permission_denied("Only NGOs organise missions"));
        }
        let mission = MedicalMission::create(&ngo.user_id, new_mission, Utc::now().naive_utc())?;
        let created = self.repository.create(mission).await?;
        info!(
            "Mission {} in {} scheduled {}..{}",
            created.id, created.location, created.start_date, created.end_date
        );
        Ok(created)
    }

    async fn request_mission(
        &self,
        patient: &Identity,
        mission_id: &str,
        new_request: NewMissionRequest,
    ) -> Result<MissionRequest> {
        new_request.validate()?;
        let request = self
            .repository
            .create_request(&patient.user_id, mission_id, new_request)
            .await
            .map_err(|e| match e {
                Error::Database(DatabaseError::UniqueViolation(_)) => Error::ConstraintViolation(
                    "You have already requested this mission".to_string(),
                ),
                other => other,
            })?;
        info!("Mission request {} opened for mission {}", request.id, mission_id);
        Ok(request)
    }
}
