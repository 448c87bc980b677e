//! NGO medical missions and patients' requests to be seen on them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{
    MISSION_LOCATION_MAX_LEN, MISSION_NOTES_MAX_LEN, MISSION_SPECIALTIES_MAX,
    MISSION_SPECIALTY_MAX_LEN, MISSION_TITLE_MAX_LEN,
};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::{check_max_len, optional_text, required_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
}

impl MissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::Upcoming => "upcoming",
            MissionStatus::Active => "active",
            MissionStatus::Completed => "completed",
        }
    }
}

impl FromStr for MissionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "upcoming" => Ok(MissionStatus::Upcoming),
            "active" => Ok(MissionStatus::Active),
            "completed" => Ok(MissionStatus::Completed),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown mission status '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissionRequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl MissionRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionRequestStatus::Pending => "pending",
            MissionRequestStatus::Approved => "approved",
            MissionRequestStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for MissionRequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(MissionRequestStatus::Pending),
            "approved" => Ok(MissionRequestStatus::Approved),
            "rejected" => Ok(MissionRequestStatus::Rejected),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown mission request status '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicalMission {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ngo_id: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: MissionStatus,
    pub specialties: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewMission {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl MedicalMission {
    pub fn create(ngo_id: &str, new_mission: NewMission, now: NaiveDateTime) -> Result<Self> {
        let ngo_id = required_text(Some(ngo_id), "ngo_id")?;
        let title = required_text(new_mission.title.as_deref(), "title")?;
        check_max_len(title, "title", MISSION_TITLE_MAX_LEN)?;
        let description = required_text(new_mission.description.as_deref(), "description")?;
        let location = required_text(new_mission.location.as_deref(), "location")?;
        check_max_len(location, "location", MISSION_LOCATION_MAX_LEN)?;

        let start_date = new_mission
            .start_date
            .ok_or_else(|| ValidationError::MissingField("start_date".to_string()))?;
        let end_date = new_mission
            .end_date
            .ok_or_else(|| ValidationError::MissingField("end_date".to_string()))?;
        if end_date < start_date {
            return Err(ValidationError::InvalidInput(
                "end_date must not be before start_date".to_string(),
            )
            .into());
        }

        if new_mission.specialties.len() > MISSION_SPECIALTIES_MAX {
            return Err(ValidationError::InvalidInput(format!(
                "At most {} specialties may be listed",
                MISSION_SPECIALTIES_MAX
            ))
            .into());
        }
        let mut specialties = Vec::with_capacity(new_mission.specialties.len());
        for specialty in &new_mission.specialties {
            let Some(specialty) = optional_text(Some(specialty.as_str())) else {
                continue;
            };
            check_max_len(&specialty, "specialties", MISSION_SPECIALTY_MAX_LEN)?;
            if !specialties.contains(&specialty) {
                specialties.push(specialty);
            }
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            ngo_id: ngo_id.to_string(),
            location: location.to_string(),
            start_date,
            end_date,
            status: MissionStatus::Upcoming,
            specialties,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MissionRequest {
    pub id: String,
    pub patient_id: String,
    pub mission_id: String,
    pub status: MissionRequestStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewMissionRequest {
    pub notes: Option<String>,
}

impl NewMissionRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(notes) = optional_text(self.notes.as_deref()) {
            check_max_len(&notes, "notes", MISSION_NOTES_MAX_LEN)?;
        }
        Ok(())
    }
}

impl MissionRequest {
    /// Opens a pending request. Only upcoming missions take requests.
    pub fn open(
        patient_id: &str,
        mission: &MedicalMission,
        new_request: &NewMissionRequest,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let patient_id = required_text(Some(patient_id), "patient_id")?;
        new_request.validate()?;
        if mission.status != MissionStatus::Upcoming {
            return Err(Error::not_found("Open mission", &mission.id));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            mission_id: mission.id.clone(),
            status: MissionRequestStatus::Pending,
            notes: optional_text(new_request.notes.as_deref()),
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    fn camp() -> NewMission {
        NewMission {
            title: Some("Pediatric surgery week".to_string()),
            description: Some("Visiting surgeons from abroad".to_string()),
            location: Some("Nablus".to_string()),
            start_date: Some(date(10)),
            end_date: Some(date(17)),
            specialties: vec![
                " pediatrics ".to_string(),
                "".to_string(),
                "pediatrics".to_string(),
                "orthopedics".to_string(),
            ],
        }
    }

    #[test]
    fn test_create_cleans_specialties() {
        let mission = MedicalMission::create("ngo-1", camp(), Utc::now().naive_utc()).unwrap();
        assert_eq!(mission.status, MissionStatus::Upcoming);
        assert_eq!(mission.specialties, vec!["pediatrics", "orthopedics"]);
    }

    #[test]
    fn test_single_day_mission_is_allowed_but_not_reversed_dates() {
        let mut input = camp();
        input.end_date = Some(date(10));
        assert!(MedicalMission::create("ngo-1", input, Utc::now().naive_utc()).is_ok());

        let mut input = camp();
        input.end_date = Some(date(9));
        assert!(matches!(
            MedicalMission::create("ngo-1", input, Utc::now().naive_utc()),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_too_many_specialties() {
        let mut input = camp();
        input.specialties = (0..=MISSION_SPECIALTIES_MAX).map(|i| format!("s{}", i)).collect();
        assert!(MedicalMission::create("ngo-1", input, Utc::now().naive_utc()).is_err());
    }

    #[test]
    fn test_only_upcoming_missions_take_requests() {
        let now = Utc::now().naive_utc();
        let mut mission = MedicalMission::create("ngo-1", camp(), now).unwrap();
        let request = NewMissionRequest {
            notes: Some("Hip pain".to_string()),
        };
        let opened = MissionRequest::open("pat-1", &mission, &request, now).unwrap();
        assert_eq!(opened.status, MissionRequestStatus::Pending);
        assert_eq!(opened.notes.as_deref(), Some("Hip pain"));

        mission.status = MissionStatus::Completed;
        assert!(matches!(
            MissionRequest::open("pat-1", &mission, &request, now),
            Err(Error::NotFound(_))
        ));
    }
}
