#[cfg(test)]
mod tests {
    use crate::donations::{
        Donation, DonationReceipt, DonationRepositoryTrait, DonationService, DonationServiceTrait,
        LedgerEntry, NewDonation, TreatmentLedger,
    };
    use crate::errors::{DatabaseError, Error, Result, ValidationError};
    use crate::treatments::{NewTreatment, Treatment, TreatmentStatus};
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-memory ledger. `failures` are returned, in order, before any real write.
    #[derive(Default)]
    struct MockDonationRepository {
        treatments: Mutex<HashMap<String, Treatment>>,
        donations: Mutex<Vec<Donation>>,
        failures: Mutex<VecDeque<Error>>,
        always_busy: bool,
        calls: AtomicUsize,
    }

    impl MockDonationRepository {
        fn with_treatment(goal: Decimal) -> (Self, String) {
            let treatment = Treatment::create(
                "patient-1",
                NewTreatment {
                    title: Some("Chemotherapy".to_string()),
                    description: Some("Three cycles".to_string()),
                    category: None,
                    goal_amount: Some(goal),
                    consent_given: true,
                },
                Utc::now().naive_utc(),
            )
            .unwrap();
            let id = treatment.id.clone();
            let repo = Self::default();
            repo.treatments
                .lock()
                .unwrap()
                .insert(id.clone(), treatment);
            (repo, id)
        }

        fn fail_next(&self, error: Error) {
            self.failures.lock().unwrap().push_back(error);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DonationRepositoryTrait for MockDonationRepository {
        async fn record(
            &self,
            donor_id: &str,
            new_donation: NewDonation,
        ) -> Result<DonationReceipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.always_busy {
                return Err(DatabaseError::Busy("database is locked".to_string()).into());
            }
            if let Some(err) = self.failures.lock().unwrap().pop_front() {
                return Err(err);
            }

            let mut treatments = self.treatments.lock().unwrap();
            let stored = treatments
                .get_mut(&new_donation.treatment_id)
                .ok_or_else(|| Error::not_found("Treatment", &new_donation.treatment_id))?;
            let mut treatment = stored.clone();
            let donation =
                Donation::apply_to(&mut treatment, donor_id, &new_donation, Utc::now().naive_utc())?;
            *stored = treatment.clone();
            self.donations.lock().unwrap().push(donation.clone());
            Ok(DonationReceipt {
                donation,
                treatment,
            })
        }

        fn load_ledger(&self, treatment_id: &str) -> Result<Option<TreatmentLedger>> {
            let Some(treatment) = self.treatments.lock().unwrap().get(treatment_id).cloned() else {
                return Ok(None);
            };
            let entries = self
                .donations
                .lock()
                .unwrap()
                .iter()
                .filter(|d| d.treatment_id == treatment_id)
                .map(|d| LedgerEntry {
                    donation: d.clone(),
                    donor_name: None,
                })
                .collect();
            Ok(Some(TreatmentLedger { treatment, entries }))
        }
    }

    fn donation(treatment_id: &str, amount: Decimal) -> NewDonation {
        NewDonation {
            treatment_id: treatment_id.to_string(),
            amount,
            receipt_url: None,
        }
    }

    #[tokio::test]
    async fn test_donate_updates_treatment_and_returns_both() {
        let (repo, id) = MockDonationRepository::with_treatment(dec!(100));
        let service = DonationService::new(Arc::new(repo));

        let receipt = service.donate("donor-1", donation(&id, dec!(25.5))).await.unwrap();

        assert_eq!(receipt.donation.amount.to_string(), "25.50");
        assert_eq!(receipt.donation.donor_id, "donor-1");
        assert_eq!(receipt.donation.treatment_id, id);
        assert_eq!(receipt.treatment.funded_amount, dec!(25.50));
        assert_eq!(receipt.treatment.status, TreatmentStatus::Active);
    }

    #[tokio::test]
    async fn test_sequential_donations_reach_goal() {
        let (repo, id) = MockDonationRepository::with_treatment(dec!(100));
        let repo = Arc::new(repo);
        let service = DonationService::new(repo.clone());

        for amount in [dec!(40), dec!(40), dec!(30)] {
            service.donate("donor-1", donation(&id, amount)).await.unwrap();
        }

        let ledger = repo.load_ledger(&id).unwrap().unwrap();
        assert_eq!(ledger.treatment.funded_amount.to_string(), "110.00");
        assert_eq!(ledger.treatment.status, TreatmentStatus::Funded);
        assert_eq!(ledger.entries.len(), 3);
        assert!(ledger.is_balanced());
    }

    #[tokio::test]
    async fn test_invalid_amount_never_reaches_repository() {
        let (repo, id) = MockDonationRepository::with_treatment(dec!(100));
        let repo = Arc::new(repo);
        let service = DonationService::new(repo.clone());

        for amount in [dec!(0), dec!(-10), dec!(1.005)] {
            let err = service.donate("donor-1", donation(&id, amount)).await.unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{amount}: {err:?}");
        }
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_bad_receipt_url_is_rejected() {
        let (repo, id) = MockDonationRepository::with_treatment(dec!(100));
        let repo = Arc::new(repo);
        let service = DonationService::new(repo.clone());
        let mut input = donation(&id, dec!(5));
        input.receipt_url = Some("ftp://example.org/receipt.pdf".to_string());

        let err = service.donate("donor-1", input).await.unwrap_err();

        assert!(matches!(err, Error::Validation(ValidationError::InvalidInput(_))));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_receipt_url_is_stored_as_none() {
        let (repo, id) = MockDonationRepository::with_treatment(dec!(100));
        let service = DonationService::new(Arc::new(repo));
        let mut input = donation(&id, dec!(5));
        input.receipt_url = Some("   ".to_string());

        let receipt = service.donate("donor-1", input).await.unwrap();

        assert_eq!(receipt.donation.receipt_url, None);
    }

    #[tokio::test]
    async fn test_missing_treatment_is_not_found() {
        let (repo, _) = MockDonationRepository::with_treatment(dec!(100));
        let repo = Arc::new(repo);
        let service = DonationService::new(repo.clone());

        let err = service
            .donate("donor-1", donation("999", dec!(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(repo.calls(), 1);
        assert!(repo.donations.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_database_is_retried() {
        let (repo, id) = MockDonationRepository::with_treatment(dec!(100));
        repo.fail_next(DatabaseError::Busy("database is locked".to_string()).into());
        repo.fail_next(DatabaseError::Busy("database is locked".to_string()).into());
        let repo = Arc::new(repo);
        let service = DonationService::new(repo.clone());

        let receipt = service.donate("donor-1", donation(&id, dec!(10))).await.unwrap();

        assert_eq!(repo.calls(), 3);
        assert_eq!(receipt.treatment.funded_amount, dec!(10));
        assert_eq!(repo.donations.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_conflict() {
        let (mut repo, id) = MockDonationRepository::with_treatment(dec!(100));
        repo.always_busy = true;
        let repo = Arc::new(repo);
        let service = DonationService::new(repo.clone()).with_max_attempts(4);

        let err = service
            .donate("donor-1", donation(&id, dec!(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(repo.calls(), 4);
        assert!(repo.donations.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_retryable_errors_are_not_retried() {
        let (repo, id) = MockDonationRepository::with_treatment(dec!(100));
        repo.fail_next(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
        let repo = Arc::new(repo);
        let service = DonationService::new(repo.clone());

        let err = service
            .donate("donor-1", donation(&id, dec!(10)))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Database(DatabaseError::QueryFailed(_))));
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_donations_are_all_applied() {
        let (repo, id) = MockDonationRepository::with_treatment(dec!(1000));
        let repo = Arc::new(repo);
        let service = Arc::new(DonationService::new(repo.clone()));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    service
                        .donate(&format!("donor-{i}"), donation(&id, dec!(7.25)))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let ledger = repo.load_ledger(&id).unwrap().unwrap();
        assert_eq!(ledger.entries.len(), 20);
        assert_eq!(ledger.treatment.funded_amount, dec!(145.00));
        assert!(ledger.is_balanced());
    }
}
