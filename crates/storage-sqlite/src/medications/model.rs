//! Database models for medications and medication requests.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use healthpal_core::medications::{Medication, MedicationRequest};
use healthpal_core::Result;

use crate::utils::enum_from_column;

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::medications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MedicationDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub category: String,
    pub provider_type: String,
    pub provider_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<MedicationDB> for Medication {
    type Error = healthpal_core::Error;

    fn try_from(db: MedicationDB) -> Result<Self> {
        Ok(Self {
            category: enum_from_column("medications.category", &db.category)?,
            provider_type: enum_from_column("medications.provider_type", &db.provider_type)?,
            id: db.id,
            name: db.name,
            description: db.description,
            quantity: db.quantity,
            provider_id: db.provider_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<Medication> for MedicationDB {
    fn from(domain: Medication) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            description: domain.description,
            quantity: domain.quantity,
            category: domain.category.as_str().to_string(),
            provider_type: domain.provider_type.as_str().to_string(),
            provider_id: domain.provider_id,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::medication_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MedicationRequestDB {
    pub id: String,
    pub requester_id: String,
    pub medication_id: String,
    pub delivery_address: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<MedicationRequestDB> for MedicationRequest {
    type Error = healthpal_core::Error;

    fn try_from(db: MedicationRequestDB) -> Result<Self> {
        Ok(Self {
            status: enum_from_column("medication_requests.status", &db.status)?,
            id: db.id,
            requester_id: db.requester_id,
            medication_id: db.medication_id,
            delivery_address: db.delivery_address,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<&MedicationRequest> for MedicationRequestDB {
    fn from(domain: &MedicationRequest) -> Self {
        Self {
            id: domain.id.clone(),
            requester_id: domain.requester_id.clone(),
            medication_id: domain.medication_id.clone(),
            delivery_address: domain.delivery_address.clone(),
            status: domain.status.as_str().to_string(),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
