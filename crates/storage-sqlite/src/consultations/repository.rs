use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;

use healthpal_core::consultations::{
    Consultation, ConsultationRepositoryTrait, ConsultationStatus, ConsultationView,
};
use healthpal_core::errors::{DatabaseError, Error};
use healthpal_core::users::{Identity, UserSummary};
use healthpal_core::Result;

use super::model::ConsultationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{consultations, users};
use crate::utils::enum_from_column;

type CounterpartRow = (ConsultationDB, Option<(String, String, String)>);

pub struct ConsultationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ConsultationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn into_views(rows: Vec<CounterpartRow>) -> Result<Vec<ConsultationView>> {
    rows.into_iter()
        .map(|(consultation_db, counterpart)| {
            let counterpart = counterpart
                .map(|(id, name, language)| -> Result<UserSummary> {
                    Ok(UserSummary {
                        id,
                        name,
                        language: enum_from_column("users.language", &language)?,
                    })
                })
                .transpose()?;
            Ok(ConsultationView {
                consultation: Consultation::try_from(consultation_db)?,
                counterpart,
            })
        })
        .collect()
}

fn change_status_in_tx(
    conn: &mut SqliteConnection,
    consultation_id: &str,
    actor: &Identity,
    status: ConsultationStatus,
) -> Result<Consultation> {
    let mut consultation = consultations::table
        .find(consultation_id)
        .select(ConsultationDB::as_select())
        .first::<ConsultationDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Consultation::try_from)
        .transpose()?
        .ok_or_else(|| Error::not_found("Consultation", consultation_id))?;

    consultation.change_status(actor, status, Utc::now().naive_utc())?;

    let updated = diesel::update(consultations::table.find(&consultation.id))
        .set((
            consultations::status.eq(consultation.status.as_str()),
            consultations::updated_at.eq(consultation.updated_at),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
    if updated != 1 {
        return Err(Error::Database(DatabaseError::Internal(format!(
            "Expected to update consultation '{}', updated {} rows",
            consultation.id, updated
        ))));
    }
    Ok(consultation)
}

#[async_trait]
impl ConsultationRepositoryTrait for ConsultationRepository {
    async fn create(&self, consultation: Consultation) -> Result<Consultation> {
        let row = ConsultationDB::from(consultation);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Consultation> {
                let inserted = diesel::insert_into(consultations::table)
                    .values(&row)
                    .returning(ConsultationDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Consultation::try_from(inserted)
            })
            .await
    }

    fn list_for_patient(&self, patient_id: &str) -> Result<Vec<ConsultationView>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = consultations::table
            .left_join(users::table.on(users::id.eq(consultations::doctor_id)))
            .filter(consultations::patient_id.eq(patient_id))
            .order((consultations::scheduled_at.asc(), consultations::id.asc()))
            .select((
                ConsultationDB::as_select(),
                (users::id, users::name, users::language).nullable(),
            ))
            .load::<CounterpartRow>(&mut conn)
            .map_err(StorageError::from)?;
        into_views(rows)
    }

    fn list_for_doctor(&self, doctor_id: &str) -> Result<Vec<ConsultationView>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = consultations::table
            .left_join(users::table.on(users::id.eq(consultations::patient_id)))
            .filter(consultations::doctor_id.eq(doctor_id))
            .order((consultations::scheduled_at.asc(), consultations::id.asc()))
            .select((
                ConsultationDB::as_select(),
                (users::id, users::name, users::language).nullable(),
            ))
            .load::<CounterpartRow>(&mut conn)
            .map_err(StorageError::from)?;
        into_views(rows)
    }

    async fn change_status(
        &self,
        consultation_id: &str,
        actor: Identity,
        status: ConsultationStatus,
    ) -> Result<Consultation> {
        let consultation_id = consultation_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Consultation> {
                change_status_in_tx(conn, &consultation_id, &actor, status)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{insert_user, test_db, TestDb};
    use chrono::Duration;
    use healthpal_core::consultations::NewConsultation;
    use healthpal_core::users::{Language, Role, User};

    fn doctor(id: &str) -> User {
        let now = Utc::now().naive_utc();
        User {
            id: id.to_string(),
            name: "Dr. Rana".to_string(),
            email: format!("{}@healthpal.test", id),
            phone: None,
            role: Role::Doctor,
            language: Language::En,
            verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn booking(patient_id: &str, doctor_id: &str, days: i64) -> Consultation {
        let now = Utc::now().naive_utc();
        Consultation::book(
            patient_id,
            None,
            &doctor(doctor_id),
            NewConsultation {
                doctor_id: Some(doctor_id.to_string()),
                scheduled_at: Some(now + Duration::days(days)),
                mode: None,
            },
            now,
        )
        .unwrap()
    }

    fn repository(db: &TestDb) -> ConsultationRepository {
        ConsultationRepository::new(db.pool.clone(), db.writer.clone())
    }

    #[tokio::test]
    async fn test_lists_show_the_other_party_in_slot_order() {
        let db = test_db();
        insert_user(&db.pool, "doc-1", "Dr. Rana", "doctor");
        insert_user(&db.pool, "pat-1", "Huda Saleh", "patient");
        let repo = repository(&db);
        let later = repo.create(booking("pat-1", "doc-1", 5)).await.unwrap();
        let sooner = repo.create(booking("pat-1", "doc-1", 1)).await.unwrap();
        repo.create(booking("no-profile", "doc-1", 3)).await.unwrap();

        let mine = repo.list_for_patient("pat-1").unwrap();
        let ids: Vec<_> = mine.iter().map(|v| v.consultation.id.as_str()).collect();
        assert_eq!(ids, [sooner.id.as_str(), later.id.as_str()]);
        assert_eq!(mine[0].counterpart.as_ref().unwrap().name, "Dr. Rana");

        let schedule = repo.list_for_doctor("doc-1").unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].counterpart.as_ref().unwrap().name, "Huda Saleh");
        assert!(schedule[1].counterpart.is_none());
    }

    #[tokio::test]
    async fn test_change_status_is_checked_and_persisted() {
        let db = test_db();
        insert_user(&db.pool, "doc-1", "Dr. Rana", "doctor");
        let repo = repository(&db);
        let booked = repo.create(booking("pat-1", "doc-1", 2)).await.unwrap();

        let err = repo
            .change_status(
                &booked.id,
                Identity::new("pat-2", Role::Patient),
                ConsultationStatus::Cancelled,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));

        let done = repo
            .change_status(
                &booked.id,
                Identity::new("doc-1", Role::Doctor),
                ConsultationStatus::Completed,
            )
            .await
            .unwrap();
        assert_eq!(done.status, ConsultationStatus::Completed);
        let stored = repo.list_for_patient("pat-1").unwrap();
        assert_eq!(stored[0].consultation.status, ConsultationStatus::Completed);

        assert!(matches!(
            repo.change_status(
                "missing",
                Identity::new("admin", Role::Admin),
                ConsultationStatus::Cancelled
            )
            .await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_doctor_must_exist() {
        let db = test_db();
        let err = repository(&db)
            .create(booking("pat-1", "ghost-doctor", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }
}
