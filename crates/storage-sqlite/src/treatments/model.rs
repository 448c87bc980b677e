//! Database models for treatments.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use healthpal_core::treatments::Treatment;
use healthpal_core::Result;

use crate::utils::{amount_from_column, amount_to_column, enum_from_column};

/// Database model for treatments
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::treatments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TreatmentDB {
    pub id: String,
    pub patient_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub goal_amount: String,
    pub funded_amount: String,
    pub status: String,
    pub consent_given: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<TreatmentDB> for Treatment {
    type Error = healthpal_core::Error;

    fn try_from(db: TreatmentDB) -> Result<Self> {
        Ok(Self {
            category: enum_from_column("treatments.category", &db.category)?,
            goal_amount: amount_from_column("treatments.goal_amount", &db.goal_amount)?,
            funded_amount: amount_from_column("treatments.funded_amount", &db.funded_amount)?,
            status: enum_from_column("treatments.status", &db.status)?,
            id: db.id,
            patient_id: db.patient_id,
            title: db.title,
            description: db.description,
            consent_given: db.consent_given,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<Treatment> for TreatmentDB {
    fn from(domain: Treatment) -> Self {
        Self {
            id: domain.id,
            patient_id: domain.patient_id,
            title: domain.title,
            description: domain.description,
            category: domain.category.as_str().to_string(),
            goal_amount: amount_to_column(domain.goal_amount),
            funded_amount: amount_to_column(domain.funded_amount),
            status: domain.status.as_str().to_string(),
            consent_given: domain.consent_given,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
