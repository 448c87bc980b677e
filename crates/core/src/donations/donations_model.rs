//! Donation domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::RECEIPT_URL_MAX_LEN;
use crate::errors::{Result, ValidationError};
use crate::treatments::Treatment;
use crate::utils::{check_max_len, normalize_amount, required_text};

/// An immutable contribution recorded against a treatment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Donation {
    pub id: String,
    pub donor_id: String,
    pub treatment_id: String,
    pub amount: Decimal,
    pub receipt_url: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input model for a donation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewDonation {
    pub treatment_id: String,
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")]
    pub amount: Decimal,
    pub receipt_url: Option<String>,
}

impl NewDonation {
    /// Checks the request shape without touching storage.
    pub fn validate(&self) -> Result<()> {
        required_text(Some(self.treatment_id.as_str()), "treatment_id")?;
        normalize_amount("amount", self.amount)?;
        normalized_receipt_url(self.receipt_url.as_deref())?;
        Ok(())
    }
}

impl Donation {
    /// Applies `new_donation` to `treatment` and returns the donation row to insert.
    ///
    /// The two results must be persisted together: the caller writes the
    /// returned donation and the mutated treatment in the same transaction.
    /// On error neither is changed.
    pub fn apply_to(
        treatment: &mut Treatment,
        donor_id: &str,
        new_donation: &NewDonation,
        now: NaiveDateTime,
    ) -> Result<Self> {
        let donor_id = required_text(Some(donor_id), "donor_id")?;
        if treatment.id != new_donation.treatment_id {
            return Err(ValidationError::InvalidInput(format!(
                "Donation for treatment '{}' applied to treatment '{}'",
                new_donation.treatment_id, treatment.id
            ))
            .into());
        }
        let amount = normalize_amount("amount", new_donation.amount)?;
        let receipt_url = normalized_receipt_url(new_donation.receipt_url.as_deref())?;

        treatment.apply_donation(amount, now)?;

        Ok(Self {
            id: uuid::Uuid::now_v7().to_string(),
            donor_id: donor_id.to_string(),
            treatment_id: treatment.id.clone(),
            amount,
            receipt_url,
            created_at: now,
        })
    }
}

fn normalized_receipt_url(url: Option<&str>) -> Result<Option<String>> {
    let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return Ok(None);
    };
    check_max_len(url, "receipt_url", RECEIPT_URL_MAX_LEN)?;
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(ValidationError::InvalidInput(format!(
            "receipt_url '{}' is not an http(s) URL",
            url
        ))
        .into());
    }
    Ok(Some(url.to_string()))
}

/// Result of a committed donation: the new row and the treatment after it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DonationReceipt {
    pub donation: Donation,
    pub treatment: Treatment,
}

/// A donation together with the donor's display name, if a profile exists.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub donation: Donation,
    pub donor_name: Option<String>,
}

/// A treatment and all of its donations, read from one consistent snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentLedger {
    pub treatment: Treatment,
    /// Oldest first; ties broken by donation id.
    pub entries: Vec<LedgerEntry>,
}

impl TreatmentLedger {
    pub fn donations_total(&self) -> Decimal {
        self.entries.iter().map(|e| e.donation.amount).sum()
    }

    /// The funding invariant: recorded total equals the sum of donations.
    pub fn is_balanced(&self) -> bool {
        self.donations_total() == self.treatment.funded_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treatments::NewTreatment;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 4, 2)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn treatment() -> Treatment {
        Treatment::create(
            "patient-1",
            NewTreatment {
                title: Some("Physiotherapy".to_string()),
                description: Some("Twelve sessions".to_string()),
                category: None,
                goal_amount: Some(dec!(600)),
                consent_given: true,
            },
            now(),
        )
        .unwrap()
    }

    #[test]
    fn test_apply_to_pairs_donation_with_aggregate() {
        let mut treatment = treatment();
        let input = NewDonation {
            treatment_id: treatment.id.clone(),
            amount: dec!(12.5),
            receipt_url: Some(" https://receipts.example.org/1 ".to_string()),
        };

        let donation = Donation::apply_to(&mut treatment, "donor-9", &input, now()).unwrap();

        assert_eq!(donation.amount.to_string(), "12.50");
        assert_eq!(donation.treatment_id, treatment.id);
        assert_eq!(
            donation.receipt_url.as_deref(),
            Some("https://receipts.example.org/1")
        );
        assert_eq!(treatment.funded_amount, donation.amount);
    }

    #[test]
    fn test_apply_to_wrong_treatment_changes_nothing() {
        let mut treatment = treatment();
        let before = treatment.clone();
        let input = NewDonation {
            treatment_id: "someone-else".to_string(),
            amount: dec!(10),
            receipt_url: None,
        };

        assert!(Donation::apply_to(&mut treatment, "donor-9", &input, now()).is_err());
        assert_eq!(treatment, before);
    }

    #[test]
    fn test_overlong_receipt_url_is_rejected() {
        let input = NewDonation {
            treatment_id: "t".to_string(),
            amount: dec!(1),
            receipt_url: Some(format!("https://example.org/{}", "a".repeat(250))),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_json_number_amount_is_read_exactly() {
        let input: NewDonation = serde_json::from_str(
            r#"{"treatment_id":"t-1","amount":40.0000000000000001,"receipt_url":null}"#,
        )
        .unwrap();
        assert_eq!(input.amount.to_string(), "40.0000000000000001");
        assert!(input.validate().is_err());

        let input: NewDonation =
            serde_json::from_str(r#"{"treatment_id":"t-1","amount":"40.10","receipt_url":null}"#)
                .unwrap();
        assert_eq!(input.amount, dec!(40.10));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_ledger_balance_check() {
        let mut treatment = treatment();
        let input = NewDonation {
            treatment_id: treatment.id.clone(),
            amount: dec!(20),
            receipt_url: None,
        };
        let donation = Donation::apply_to(&mut treatment, "donor-1", &input, now()).unwrap();
        let mut ledger = TreatmentLedger {
            treatment,
            entries: vec![LedgerEntry {
                donation,
                donor_name: Some("Omar".to_string()),
            }],
        };
        assert!(ledger.is_balanced());

        ledger.treatment.funded_amount = dec!(25);
        assert!(!ledger.is_balanced());
    }
}
