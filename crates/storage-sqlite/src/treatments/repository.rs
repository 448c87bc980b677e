use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use healthpal_core::treatments::{
    PatientSummary, Treatment, TreatmentPublic, TreatmentRepositoryTrait, TreatmentStatus,
};
use healthpal_core::Result;

use super::model::TreatmentDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{treatments, users};
use crate::utils::enum_from_column;

pub struct TreatmentRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TreatmentRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Loads a treatment on an existing connection, used inside write jobs.
pub(crate) fn find_treatment(
    conn: &mut SqliteConnection,
    treatment_id: &str,
) -> Result<Option<Treatment>> {
    treatments::table
        .find(treatment_id)
        .select(TreatmentDB::as_select())
        .first::<TreatmentDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Treatment::try_from)
        .transpose()
}

#[async_trait]
impl TreatmentRepositoryTrait for TreatmentRepository {
    async fn create(&self, treatment: Treatment) -> Result<Treatment> {
        let row = TreatmentDB::from(treatment);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Treatment> {
                let inserted = diesel::insert_into(treatments::table)
                    .values(&row)
                    .returning(TreatmentDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Treatment::try_from(inserted)
            })
            .await
    }

    fn get_by_id(&self, treatment_id: &str) -> Result<Option<Treatment>> {
        let mut conn = get_connection(&self.pool)?;
        find_treatment(&mut conn, treatment_id)
    }

    fn list_public(&self) -> Result<Vec<TreatmentPublic>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = treatments::table
            .left_join(users::table.on(users::id.eq(treatments::patient_id)))
            .filter(treatments::status.eq(TreatmentStatus::Active.as_str()))
            .order((treatments::created_at.asc(), treatments::id.asc()))
            .select((
                TreatmentDB::as_select(),
                (users::name, users::language).nullable(),
            ))
            .load::<(TreatmentDB, Option<(String, String)>)>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|(treatment_db, patient)| {
                let patient = patient
                    .map(|(name, language)| -> Result<PatientSummary> {
                        Ok(PatientSummary {
                            name,
                            language: enum_from_column("users.language", &language)?,
                        })
                    })
                    .transpose()?;
                Ok(TreatmentPublic::from_treatment(
                    Treatment::try_from(treatment_db)?,
                    patient,
                ))
            })
            .collect()
    }
}
