use log::{debug, error};
use std::sync::Arc;

use super::transparency_model::TransparencyReport;
use super::transparency_traits::TransparencyServiceTrait;
use crate::donations::DonationRepositoryTrait;
use crate::errors::{Error, Result};

/// Projects the donation ledger into public reports.
pub struct TransparencyService {
    repository: Arc<dyn DonationRepositoryTrait>,
}

impl TransparencyService {
    pub fn new(repository: Arc<dyn DonationRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl TransparencyServiceTrait for TransparencyService {
    fn transparency_report(&self, treatment_id: &str) -> Result<TransparencyReport> {
        let ledger = self
            .repository
            .load_ledger(treatment_id)?
            .ok_or_else(|| Error::not_found("Treatment", treatment_id))?;

        if !ledger.is_balanced() {
            // Served as stored; the mismatch is only reported.
            error!(
                "Funding ledger out of balance for treatment {}: funded_amount {} but donations sum to {}",
                treatment_id,
                ledger.treatment.funded_amount,
                ledger.donations_total()
            );
        }
        debug!(
            "Transparency report for treatment {} with {} donations",
            treatment_id,
            ledger.entries.len()
        );

        Ok(TransparencyReport::from(ledger))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donations::{
        Donation, DonationReceipt, LedgerEntry, NewDonation, TreatmentLedger,
    };
    use crate::treatments::{NewTreatment, Treatment};
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct FixedLedgerRepository {
        ledger: Option<TreatmentLedger>,
    }

    #[async_trait]
    impl DonationRepositoryTrait for FixedLedgerRepository {
        async fn record(&self, _donor_id: &str, _new_donation: NewDonation) -> Result<DonationReceipt> {
            unimplemented!()
        }

        fn load_ledger(&self, treatment_id: &str) -> Result<Option<TreatmentLedger>> {
            Ok(self
                .ledger
                .clone()
                .filter(|l| l.treatment.id == treatment_id))
        }
    }

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 20)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    fn ledger(donations: &[(Decimal, Option<&str>)]) -> TreatmentLedger {
        let mut treatment = Treatment::create(
            "patient-1",
            NewTreatment {
                title: Some("Dialysis".to_string()),
                description: Some("Weekly sessions".to_string()),
                category: None,
                goal_amount: Some(dec!(100)),
                consent_given: true,
            },
            at(0),
        )
        .unwrap();
        let entries = donations
            .iter()
            .enumerate()
            .map(|(i, (amount, name))| {
                let input = NewDonation {
                    treatment_id: treatment.id.clone(),
                    amount: *amount,
                    receipt_url: None,
                };
                let donation =
                    Donation::apply_to(&mut treatment, &format!("donor-{i}"), &input, at(i as u32 + 1))
                        .unwrap();
                LedgerEntry {
                    donation,
                    donor_name: name.map(str::to_string),
                }
            })
            .collect();
        TreatmentLedger { treatment, entries }
    }

    #[test]
    fn test_report_lists_donations_in_ledger_order() {
        let ledger = ledger(&[
            (dec!(40), Some("Layla")),
            (dec!(40), Some("Sami")),
            (dec!(30), Some("Layla")),
        ]);
        let id = ledger.treatment.id.clone();
        let service = TransparencyService::new(Arc::new(FixedLedgerRepository {
            ledger: Some(ledger),
        }));

        let report = service.transparency_report(&id).unwrap();

        assert_eq!(report.treatment.id, id);
        assert_eq!(report.treatment.funded_amount.to_string(), "110.00");
        assert_eq!(report.treatment.goal_amount.to_string(), "100.00");
        let names: Vec<_> = report.donations.iter().map(|d| d.donor_name.as_str()).collect();
        assert_eq!(names, ["Layla", "Sami", "Layla"]);
        assert_eq!(report.donations[2].amount.to_string(), "30.00");
        assert!(report.donations.windows(2).all(|w| w[0].donated_at <= w[1].donated_at));
    }

    #[test]
    fn test_missing_profile_shows_anonymous_donor() {
        let ledger = ledger(&[(dec!(15), None)]);
        let id = ledger.treatment.id.clone();
        let service = TransparencyService::new(Arc::new(FixedLedgerRepository {
            ledger: Some(ledger),
        }));

        let report = service.transparency_report(&id).unwrap();

        assert_eq!(report.donations[0].donor_name, "Anonymous Donor");
    }

    #[test]
    fn test_treatment_without_donations_has_empty_report() {
        let ledger = ledger(&[]);
        let id = ledger.treatment.id.clone();
        let service = TransparencyService::new(Arc::new(FixedLedgerRepository {
            ledger: Some(ledger),
        }));

        let report = service.transparency_report(&id).unwrap();

        assert!(report.donations.is_empty());
        assert_eq!(report.treatment.funded_amount, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_treatment_is_not_found() {
        let service = TransparencyService::new(Arc::new(FixedLedgerRepository { ledger: None }));
        assert!(matches!(
            service.transparency_report("999"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_report_does_not_expose_donor_ids() {
        let ledger = ledger(&[(dec!(5), Some("Nour"))]);
        let id = ledger.treatment.id.clone();
        let service = TransparencyService::new(Arc::new(FixedLedgerRepository {
            ledger: Some(ledger),
        }));

        let json = serde_json::to_value(service.transparency_report(&id).unwrap()).unwrap();

        assert!(json["donations"][0].get("donor_id").is_none());
        assert_eq!(json["donations"][0]["amount"], "5.00");
        assert!(json["donations"][0]["receipt_url"].is_null());
    }
}
