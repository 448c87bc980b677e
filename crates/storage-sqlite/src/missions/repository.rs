use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use healthpal_core::errors::Error;
use healthpal_core::missions::{
    MedicalMission, MissionRepositoryTrait, MissionRequest, MissionStatus, NewMissionRequest,
};
use healthpal_core::Result;

use super::model::{MedicalMissionDB, MissionRequestDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{medical_missions, mission_requests};

pub struct MissionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl MissionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn request_in_tx(
    conn: &mut SqliteConnection,
    patient_id: &str,
    mission_id: &str,
    new_request: &NewMissionRequest,
) -> Result<MissionRequest> {
    let mission = medical_missions::table
        .find(mission_id)
        .select(MedicalMissionDB::as_select())
        .first::<MedicalMissionDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(MedicalMission::try_from)
        .transpose()?
        .ok_or_else(|| Error::not_found("Open mission", mission_id))?;

    let request = MissionRequest::open(patient_id, &mission, new_request, Utc::now().naive_utc())?;
    diesel::insert_into(mission_requests::table)
        .values(MissionRequestDB::from(&request))
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(request)
}

#[async_trait]
impl MissionRepositoryTrait for MissionRepository {
    async fn create(&self, mission: MedicalMission) -> Result<MedicalMission> {
        let row = MedicalMissionDB::try_from(mission)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MedicalMission> {
                let inserted = diesel::insert_into(medical_missions::table)
                    .values(&row)
                    .returning(MedicalMissionDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                MedicalMission::try_from(inserted)
            })
            .await
    }

    fn list_upcoming(&self, location: Option<&str>) -> Result<Vec<MedicalMission>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = medical_missions::table
            .filter(medical_missions::status.eq(MissionStatus::Upcoming.as_str()))
            .select(MedicalMissionDB::as_select())
            .order((medical_missions::start_date.asc(), medical_missions::id.asc()))
            .into_boxed();
        if let Some(location) = location {
            query = query.filter(medical_missions::location.eq(location.to_string()));
        }
        query
            .load::<MedicalMissionDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(MedicalMission::try_from)
            .collect()
    }

    async fn create_request(
        &self,
        patient_id: &str,
        mission_id: &str,
        new_request: NewMissionRequest,
    ) -> Result<MissionRequest> {
        let patient_id = patient_id.to_string();
        let mission_id = mission_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MissionRequest> {
                request_in_tx(conn, &patient_id, &mission_id, &new_request)
            })
            .await
    }
}
