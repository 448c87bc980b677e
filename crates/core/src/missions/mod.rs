//! Missions module - NGO field clinics and patient requests to attend them.

mod missions_model;
mod missions_service;
mod missions_traits;

pub use missions_model::{
    MedicalMission, MissionRequest, MissionRequestStatus, MissionStatus, NewMission,
    NewMissionRequest,
};
pub use missions_service::MissionService;
pub use missions_traits::{MissionRepositoryTrait, MissionServiceTrait};
