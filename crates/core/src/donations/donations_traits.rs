//! Donation repository and service traits.

use async_trait::async_trait;

use super::donations_model::{DonationReceipt, NewDonation, TreatmentLedger};
use crate::errors::Result;

/// Trait defining the contract for donation storage.
#[async_trait]
pub trait DonationRepositoryTrait: Send + Sync {
    /// Records a donation and applies it to its treatment as one atomic unit.
    ///
    /// Implementations must serialize concurrent calls for the same treatment
    /// so that no applied amount is lost. Returns `Error::NotFound` without
    /// writing anything when the treatment does not exist.
    async fn record(&self, donor_id: &str, new_donation: NewDonation) -> Result<DonationReceipt>;

    /// Reads a treatment and all of its donations from a single snapshot.
    fn load_ledger(&self, treatment_id: &str) -> Result<Option<TreatmentLedger>>;
}

/// Trait defining the contract for the donation recorder.
#[async_trait]
pub trait DonationServiceTrait: Send + Sync {
    async fn donate(&self, donor_id: &str, new_donation: NewDonation) -> Result<DonationReceipt>;
}
