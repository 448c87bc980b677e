//! Database models for health alerts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use healthpal_core::alerts::HealthAlert;
use healthpal_core::Result;

use crate::utils::enum_from_column;

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::health_alerts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HealthAlertDB {
    pub id: String,
    pub title: String,
    pub content: String,
    pub region: String,
    pub severity: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<HealthAlertDB> for HealthAlert {
    type Error = healthpal_core::Error;

    fn try_from(db: HealthAlertDB) -> Result<Self> {
        Ok(Self {
            severity: enum_from_column("health_alerts.severity", &db.severity)?,
            id: db.id,
            title: db.title,
            content: db.content,
            region: db.region,
            created_at: db.created_at,
        })
    }
}

impl From<HealthAlert> for HealthAlertDB {
    fn from(domain: HealthAlert) -> Self {
        Self {
            id: domain.id,
            title: domain.title,
            content: domain.content,
            region: domain.region,
            severity: domain.severity.as_str().to_string(),
            created_at: domain.created_at,
        }
    }
}
