use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use healthpal_core::errors::{DatabaseError, Error};
use healthpal_core::medications::{
    FulfilledRequest, Medication, MedicationRepositoryTrait, MedicationRequest,
    NewMedicationRequest,
};
use healthpal_core::Result;

use super::model::{MedicationDB, MedicationRequestDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{medication_requests, medications};

pub struct MedicationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MedicationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn find_medication(conn: &mut SqliteConnection, medication_id: &str) -> Result<Option<Medication>> {
    medications::table
        .find(medication_id)
        .select(MedicationDB::as_select())
        .first::<MedicationDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Medication::try_from)
        .transpose()
}

fn expect_one(updated: usize, entity: &str, id: &str) -> Result<()> {
    if updated != 1 {
        return Err(Error::Database(DatabaseError::Internal(format!(
            "Expected to update {} '{}', updated {} rows",
            entity, id, updated
        ))));
    }
    Ok(())
}

fn open_request_in_tx(
    conn: &mut SqliteConnection,
    requester_id: &str,
    new_request: &NewMedicationRequest,
) -> Result<MedicationRequest> {
    let medication_id = new_request
        .medication_id
        .as_deref()
        .map(str::trim)
        .unwrap_or_default();
    let medication = find_medication(conn, medication_id)?
        .ok_or_else(|| Error::not_found("Medication", medication_id))?;

    let request =
        MedicationRequest::open(requester_id, &medication, new_request, Utc::now().naive_utc())?;
    diesel::insert_into(medication_requests::table)
        .values(MedicationRequestDB::from(&request))
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(request)
}

fn fulfil_in_tx(conn: &mut SqliteConnection, request_id: &str) -> Result<FulfilledRequest> {
    let mut request = medication_requests::table
        .find(request_id)
        .select(MedicationRequestDB::as_select())
        .first::<MedicationRequestDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(MedicationRequest::try_from)
        .transpose()?
        .ok_or_else(|| Error::not_found("Medication request", request_id))?;
    let mut medication = find_medication(conn, &request.medication_id)?
        .ok_or_else(|| Error::not_found("Medication", &request.medication_id))?;

    request.fulfil(&mut medication, Utc::now().naive_utc())?;

    let updated = diesel::update(medications::table.find(&medication.id))
        .set((
            medications::quantity.eq(medication.quantity),
            medications::updated_at.eq(medication.updated_at),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
    expect_one(updated, "medication", &medication.id)?;

    let updated = diesel::update(medication_requests::table.find(&request.id))
        .set((
            medication_requests::status.eq(request.status.as_str()),
            medication_requests::updated_at.eq(request.updated_at),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
    expect_one(updated, "medication request", &request.id)?;

    Ok(FulfilledRequest {
        request,
        medication,
    })
}

#[async_trait]
impl MedicationRepositoryTrait for MedicationRepository {
    async fn create(&self, medication: Medication) -> Result<Medication> {
        let row = MedicationDB::from(medication);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Medication> {
                let inserted = diesel::insert_into(medications::table)
                    .values(&row)
                    .returning(MedicationDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Medication::try_from(inserted)
            })
            .await
    }

    fn list_available(&self) -> Result<Vec<Medication>> {
        let mut conn = get_connection(&self.pool)?;
        medications::table
            .filter(medications::quantity.gt(0))
            .order((medications::created_at.desc(), medications::id.desc()))
            .select(MedicationDB::as_select())
            .load::<MedicationDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(Medication::try_from)
            .collect()
    }

    async fn open_request(
        &self,
        requester_id: &str,
        new_request: NewMedicationRequest,
    ) -> Result<MedicationRequest> {
        let requester_id = requester_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MedicationRequest> {
                open_request_in_tx(conn, &requester_id, &new_request)
            })
            .await
    }

    async fn fulfil_request(&self, request_id: &str) -> Result<FulfilledRequest> {
        let request_id = request_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<FulfilledRequest> {
                fulfil_in_tx(conn, &request_id)
            })
            .await
    }
}
