use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;
use std::sync::Arc;

use healthpal_core::donations::{
    Donation, DonationReceipt, DonationRepositoryTrait, LedgerEntry, NewDonation, TreatmentLedger,
};
use healthpal_core::errors::{DatabaseError, Error};
use healthpal_core::Result;

use super::model::DonationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{donations, treatments, users};
use crate::treatments::find_treatment;
use crate::utils::amount_to_column;

pub struct DonationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl DonationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

/// Read-modify-write of one donation. Runs inside the writer's immediate transaction.
fn record_in_tx(
    conn: &mut SqliteConnection,
    donor_id: &str,
    new_donation: &NewDonation,
) -> Result<DonationReceipt> {
    let mut treatment = find_treatment(conn, &new_donation.treatment_id)?
        .ok_or_else(|| Error::not_found("Treatment", &new_donation.treatment_id))?;

    let donation = Donation::apply_to(
        &mut treatment,
        donor_id,
        new_donation,
        Utc::now().naive_utc(),
    )?;

    diesel::insert_into(donations::table)
        .values(DonationDB::from(&donation))
        .execute(conn)
        .map_err(StorageError::from)?;

    let updated = diesel::update(treatments::table.find(&treatment.id))
        .set((
            treatments::funded_amount.eq(amount_to_column(treatment.funded_amount)),
            treatments::status.eq(treatment.status.as_str()),
            treatments::updated_at.eq(treatment.updated_at),
        ))
        .execute(conn)
        .map_err(StorageError::from)?;
    if updated != 1 {
        return Err(Error::Database(DatabaseError::Internal(format!(
            "Expected to update treatment '{}', updated {} rows",
            treatment.id, updated
        ))));
    }

    Ok(DonationReceipt {
        donation,
        treatment,
    })
}

#[async_trait]
impl DonationRepositoryTrait for DonationRepository {
    async fn record(&self, donor_id: &str, new_donation: NewDonation) -> Result<DonationReceipt> {
        let donor_id = donor_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<DonationReceipt> {
                record_in_tx(conn, &donor_id, &new_donation)
            })
            .await
    }

    fn load_ledger(&self, treatment_id: &str) -> Result<Option<TreatmentLedger>> {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, StorageError, _>(|c| {
            let Some(treatment) = find_treatment(c, treatment_id)? else {
                return Ok(None);
            };

            let rows = donations::table
                .left_join(users::table.on(users::id.eq(donations::donor_id)))
                .filter(donations::treatment_id.eq(treatment_id))
                .order((donations::created_at.asc(), donations::id.asc()))
                .select((DonationDB::as_select(), users::name.nullable()))
                .load::<(DonationDB, Option<String>)>(c)?;
            debug!(
                "Loaded {} donations for treatment {}",
                rows.len(),
                treatment_id
            );

            let entries = rows
                .into_iter()
                .map(|(donation_db, donor_name)| -> Result<LedgerEntry> {
                    Ok(LedgerEntry {
                        donation: Donation::try_from(donation_db)?,
                        donor_name,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Some(TreatmentLedger { treatment, entries }))
        })
        .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{insert_user, test_db, TestDb};
    use crate::treatments::TreatmentRepository;
    use healthpal_core::donations::{DonationService, DonationServiceTrait};
    use healthpal_core::transparency::{TransparencyService, TransparencyServiceTrait};
    use healthpal_core::treatments::{
        NewTreatment, TreatmentRepositoryTrait, TreatmentService, TreatmentServiceTrait,
        TreatmentStatus,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    async fn open_treatment(db: &TestDb, goal: Decimal) -> String {
        let service = TreatmentService::new(Arc::new(TreatmentRepository::new(
            db.pool.clone(),
            db.writer.clone(),
        )));
        service
            .create_treatment(
                "patient-1",
                NewTreatment {
                    title: Some("Heart Surgery".to_string()),
                    description: Some("Valve replacement".to_string()),
                    category: None,
                    goal_amount: Some(goal),
                    consent_given: true,
                },
            )
            .await
            .unwrap()
            .id
    }

    fn repository(db: &TestDb) -> Arc<DonationRepository> {
        Arc::new(DonationRepository::new(db.pool.clone(), db.writer.clone()))
    }

    fn donation(treatment_id: &str, amount: Decimal) -> NewDonation {
        NewDonation {
            treatment_id: treatment_id.to_string(),
            amount,
            receipt_url: None,
        }
    }

    fn donation_count(db: &TestDb) -> i64 {
        let mut conn = get_connection(&db.pool).unwrap();
        donations::table.count().get_result(&mut conn).unwrap()
    }

    #[tokio::test]
    async fn test_record_commits_donation_and_total_together() {
        let db = test_db();
        let id = open_treatment(&db, dec!(100)).await;
        let repo = repository(&db);

        let receipt = repo
            .record(
                "donor-1",
                NewDonation {
                    treatment_id: id.clone(),
                    amount: dec!(40),
                    receipt_url: Some("https://bank.example.org/r/1".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(receipt.treatment.funded_amount.to_string(), "40.00");
        let ledger = repo.load_ledger(&id).unwrap().unwrap();
        assert_eq!(ledger.entries.len(), 1);
        assert_eq!(ledger.entries[0].donation, receipt.donation);
        assert_eq!(ledger.treatment, receipt.treatment);
        assert!(ledger.is_balanced());
    }

    #[tokio::test]
    async fn test_reaching_goal_persists_funded_status() {
        let db = test_db();
        let id = open_treatment(&db, dec!(100)).await;
        let service = DonationService::new(repository(&db));

        for amount in [dec!(40), dec!(40), dec!(30)] {
            service.donate("donor-1", donation(&id, amount)).await.unwrap();
        }

        let treatment = TreatmentRepository::new(db.pool.clone(), db.writer.clone())
            .get_by_id(&id)
            .unwrap()
            .unwrap();
        assert_eq!(treatment.funded_amount.to_string(), "110.00");
        assert_eq!(treatment.status, TreatmentStatus::Funded);
    }

    #[tokio::test]
    async fn test_unknown_treatment_writes_nothing() {
        let db = test_db();
        let repo = repository(&db);

        let err = repo.record("donor-1", donation("999", dec!(10))).await.unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(donation_count(&db), 0);
        assert!(repo.load_ledger("999").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_apply_rolls_back() {
        let db = test_db();
        let id = open_treatment(&db, dec!(99999999.99)).await;
        let repo = repository(&db);
        repo.record("donor-1", donation(&id, dec!(99999999.99)))
            .await
            .unwrap();

        let err = repo.record("donor-2", donation(&id, dec!(1))).await.unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(donation_count(&db), 1);
        assert!(repo.load_ledger(&id).unwrap().unwrap().is_balanced());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_donations_lose_no_updates() {
        let db = test_db();
        let id = open_treatment(&db, dec!(1000)).await;
        let service = Arc::new(DonationService::new(repository(&db)));

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let service = service.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    let amount = Decimal::new(100 + i, 2);
                    service
                        .donate(&format!("donor-{}", i % 7), donation(&id, amount))
                        .await
                        .map(|_| amount)
                })
            })
            .collect();

        let mut expected = Decimal::ZERO;
        for handle in handles {
            expected += handle.await.unwrap().unwrap();
        }

        let ledger = repository(&db).load_ledger(&id).unwrap().unwrap();
        assert_eq!(ledger.entries.len(), 50);
        assert_eq!(ledger.treatment.funded_amount, expected);
        assert!(ledger.is_balanced());
        assert!(ledger
            .entries
            .windows(2)
            .all(|w| w[0].donation.created_at <= w[1].donation.created_at));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_donations_cross_goal_once() {
        let db = test_db();
        let id = open_treatment(&db, dec!(100)).await;
        let service = Arc::new(DonationService::new(repository(&db)));

        let handles: Vec<_> = [dec!(40), dec!(40), dec!(30)]
            .into_iter()
            .enumerate()
            .map(|(i, amount)| {
                let service = service.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    service
                        .donate(&format!("donor-{}", i), donation(&id, amount))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let ledger = repository(&db).load_ledger(&id).unwrap().unwrap();
        assert_eq!(ledger.treatment.funded_amount.to_string(), "110.00");
        assert_eq!(ledger.treatment.status, TreatmentStatus::Funded);
        assert_eq!(ledger.entries.len(), 3);
    }

    #[tokio::test]
    async fn test_ledger_joins_donor_names() {
        let db = test_db();
        insert_user(&db.pool, "donor-1", "Layla Haddad", "donor");
        let id = open_treatment(&db, dec!(500)).await;
        let repo = repository(&db);
        repo.record("donor-1", donation(&id, dec!(25))).await.unwrap();
        repo.record("ghost", donation(&id, dec!(10))).await.unwrap();

        let report = TransparencyService::new(repo).transparency_report(&id).unwrap();

        let names: Vec<_> = report.donations.iter().map(|d| d.donor_name.as_str()).collect();
        assert_eq!(names, ["Layla Haddad", "Anonymous Donor"]);
        assert_eq!(report.treatment.funded_amount.to_string(), "35.00");
    }

    #[tokio::test]
    async fn test_donations_are_immutable() {
        let db = test_db();
        let id = open_treatment(&db, dec!(100)).await;
        let repo = repository(&db);
        let receipt = repo.record("donor-1", donation(&id, dec!(10))).await.unwrap();
        let donation_id = receipt.donation.id.clone();

        let update = db
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::update(donations::table.find(donation_id))
                    .set(donations::amount.eq("1000.00"))
                    .execute(conn)
                    .map_err(|e| StorageError::from(e).into())
            })
            .await;
        assert!(matches!(update, Err(Error::ConstraintViolation(_))));

        let mut conn = get_connection(&db.pool).unwrap();
        let deleted = diesel::delete(donations::table).execute(&mut conn);
        assert!(deleted.is_err());
        assert_eq!(donation_count(&db), 1);
    }
}
