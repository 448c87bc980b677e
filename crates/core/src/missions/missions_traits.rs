//! Medical mission repository and service traits.

use async_trait::async_trait;

use super::missions_model::{MedicalMission, MissionRequest, NewMission, NewMissionRequest};
use crate::errors::Result;
use crate::users::Identity;

#[async_trait]
pub trait MissionRepositoryTrait: Send + Sync {
    async fn create(&self, mission: MedicalMission) -> Result<MedicalMission>;

    /// Upcoming missions by start date, optionally in one location.
    fn list_upcoming(&self, location: Option<&str>) -> Result<Vec<MedicalMission>>;

    /// Loads the mission and inserts the request in one write transaction.
    /// A repeat request fails with a unique violation.
    async fn create_request(
        &self,
        patient_id: &str,
        mission_id: &str,
        new_request: NewMissionRequest,
    ) -> Result<MissionRequest>;
}

#[async_trait]
pub trait MissionServiceTrait: Send + Sync {
    fn list_missions(&self, location: Option<&str>) -> Result<Vec<MedicalMission>>;

    async fn create_mission(&self, ngo: &Identity, new_mission: NewMission)
        -> Result<MedicalMission>;

    async fn request_mission(
        &self,
        patient: &Identity,
        mission_id: &str,
        new_request: NewMissionRequest,
    ) -> Result<MissionRequest>;
}
