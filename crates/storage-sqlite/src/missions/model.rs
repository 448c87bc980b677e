//! Database models for medical missions and mission requests.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use healthpal_core::errors::{DatabaseError, Error};
use healthpal_core::missions::{MedicalMission, MissionRequest};
use healthpal_core::Result;

use crate::utils::enum_from_column;

/// `specialties` is a JSON array of strings.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::medical_missions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MedicalMissionDB {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ngo_id: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub specialties: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<MedicalMissionDB> for MedicalMission {
    type Error = healthpal_core::Error;

    fn try_from(db: MedicalMissionDB) -> Result<Self> {
        let specialties = serde_json::from_str(&db.specialties).map_err(|e| {
            Error::Database(DatabaseError::Internal(format!(
                "Stored medical_missions.specialties '{}' is not a JSON list: {}",
                db.specialties, e
            )))
        })?;
        Ok(Self {
            status: enum_from_column("medical_missions.status", &db.status)?,
            specialties,
            id: db.id,
            title: db.title,
            description: db.description,
            ngo_id: db.ngo_id,
            location: db.location,
            start_date: db.start_date,
            end_date: db.end_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl TryFrom<MedicalMission> for MedicalMissionDB {
    type Error = healthpal_core::Error;

    fn try_from(domain: MedicalMission) -> Result<Self> {
        let specialties = serde_json::to_string(&domain.specialties)
            .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))?;
        Ok(Self {
            id: domain.id,
            title: domain.title,
            description: domain.description,
            ngo_id: domain.ngo_id,
            location: domain.location,
            start_date: domain.start_date,
            end_date: domain.end_date,
            status: domain.status.as_str().to_string(),
            specialties,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        })
    }
}

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::mission_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MissionRequestDB {
    pub id: String,
    pub patient_id: String,
    pub mission_id: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<MissionRequestDB> for MissionRequest {
    type Error = healthpal_core::Error;

    fn try_from(db: MissionRequestDB) -> Result<Self> {
        Ok(Self {
            status: enum_from_column("mission_requests.status", &db.status)?,
            id: db.id,
            patient_id: db.patient_id,
            mission_id: db.mission_id,
            notes: db.notes,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<&MissionRequest> for MissionRequestDB {
    fn from(domain: &MissionRequest) -> Self {
        Self {
            id: domain.id.clone(),
            patient_id: domain.patient_id.clone(),
            mission_id: domain.mission_id.clone(),
            status: domain.status.as_str().to_string(),
            notes: domain.notes.clone(),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
