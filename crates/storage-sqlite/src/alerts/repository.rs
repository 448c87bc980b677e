use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use healthpal_core::alerts::{AlertRepositoryTrait, HealthAlert};
use healthpal_core::Result;

use super::model::HealthAlertDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::health_alerts;

pub struct AlertRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AlertRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AlertRepositoryTrait for AlertRepository {
    async fn create(&self, alert: HealthAlert) -> Result<HealthAlert> {
        let row = HealthAlertDB::from(alert);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<HealthAlert> {
                let inserted = diesel::insert_into(health_alerts::table)
                    .values(&row)
                    .returning(HealthAlertDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                HealthAlert::try_from(inserted)
            })
            .await
    }

    fn list(&self, region: Option<&str>) -> Result<Vec<HealthAlert>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = health_alerts::table
            .select(HealthAlertDB::as_select())
            .order((health_alerts::created_at.desc(), health_alerts::id.desc()))
            .into_boxed();
        if let Some(region) = region {
            query = query.filter(health_alerts::region.eq(region.to_string()));
        }
        query
            .load::<HealthAlertDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(HealthAlert::try_from)
            .collect()
    }
}
