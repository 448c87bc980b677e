//! Database models for consultations.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use healthpal_core::consultations::Consultation;
use healthpal_core::Result;

use crate::utils::enum_from_column;

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::consultations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ConsultationDB {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub scheduled_at: NaiveDateTime,
    pub mode: String,
    pub status: String,
    pub needs_translation: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ConsultationDB> for Consultation {
    type Error = healthpal_core::Error;

    fn try_from(db: ConsultationDB) -> Result<Self> {
        Ok(Self {
            mode: enum_from_column("consultations.mode", &db.mode)?,
            status: enum_from_column("consultations.status", &db.status)?,
            id: db.id,
            patient_id: db.patient_id,
            doctor_id: db.doctor_id,
            scheduled_at: db.scheduled_at,
            needs_translation: db.needs_translation,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<Consultation> for ConsultationDB {
    fn from(domain: Consultation) -> Self {
        Self {
            id: domain.id,
            patient_id: domain.patient_id,
            doctor_id: domain.doctor_id,
            scheduled_at: domain.scheduled_at,
            mode: domain.mode.as_str().to_string(),
            status: domain.status.as_str().to_string(),
            needs_translation: domain.needs_translation,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
