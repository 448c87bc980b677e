use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::ANONYMOUS_DONOR_NAME;
use crate::donations::{LedgerEntry, TreatmentLedger};

/// Treatment fields shown on a transparency report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentSummary {
    pub id: String,
    pub title: String,
    pub goal_amount: Decimal,
    pub funded_amount: Decimal,
}

/// One donation as shown publicly. Donor ids are never exposed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DonationEntry {
    pub donor_name: String,
    pub amount: Decimal,
    pub receipt_url: Option<String>,
    pub donated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransparencyReport {
    pub treatment: TreatmentSummary,
    pub donations: Vec<DonationEntry>,
}

impl From<LedgerEntry> for DonationEntry {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            donor_name: entry
                .donor_name
                .unwrap_or_else(|| ANONYMOUS_DONOR_NAME.to_string()),
            amount: entry.donation.amount,
            receipt_url: entry.donation.receipt_url,
            donated_at: entry.donation.created_at,
        }
    }
}

impl From<TreatmentLedger> for TransparencyReport {
    fn from(ledger: TreatmentLedger) -> Self {
        let treatment = ledger.treatment;
        Self {
            treatment: TreatmentSummary {
                id: treatment.id,
                title: treatment.title,
                goal_amount: treatment.goal_amount,
                funded_amount: treatment.funded_amount,
            },
            donations: ledger.entries.into_iter().map(DonationEntry::from).collect(),
        }
    }
}
