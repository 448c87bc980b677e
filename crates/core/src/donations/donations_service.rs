use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

use super::donations_model::{DonationReceipt, NewDonation};
use super::donations_traits::{DonationRepositoryTrait, DonationServiceTrait};
use crate::constants::{DEFAULT_DONATION_MAX_ATTEMPTS, DONATION_RETRY_BACKOFF_MS};
use crate::errors::{Error, Result};

/// Records donations, retrying writes that lost a race for the database lock.
pub struct DonationService {
    repository: Arc<dyn DonationRepositoryTrait>,
    max_attempts: u32,
}

impl DonationService {
    pub fn new(repository: Arc<dyn DonationRepositoryTrait>) -> Self {
        Self {
            repository,
            max_attempts: DEFAULT_DONATION_MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of attempts per donation. Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

#[async_trait::async_trait]
impl DonationServiceTrait for DonationService {
    async fn donate(&self, donor_id: &str, new_donation: NewDonation) -> Result<DonationReceipt> {
        new_donation.validate()?;

        let mut attempt = 1;
        loop {
            debug!(
                "Recording donation of {} to treatment {} (attempt {}/{})",
                new_donation.amount, new_donation.treatment_id, attempt, self.max_attempts
            );
            match self.repository.record(donor_id, new_donation.clone()).await {
                Ok(receipt) => {
                    info!(
                        "Donation {} of {} recorded for treatment {} (funded {}/{}, status {})",
                        receipt.donation.id,
                        receipt.donation.amount,
                        receipt.treatment.id,
                        receipt.treatment.funded_amount,
                        receipt.treatment.goal_amount,
                        receipt.treatment.status
                    );
                    return Ok(receipt);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(
                        "Donation to treatment {} failed on attempt {}: {}. Retrying",
                        new_donation.treatment_id, attempt, e
                    );
                    tokio::time::sleep(Duration::from_millis(
                        DONATION_RETRY_BACKOFF_MS * u64::from(attempt),
                    ))
                    .await;
                    attempt += 1;
                }
                Err(e) if e.is_retryable() => {
                    warn!(
                        "Giving up on donation to treatment {} after {} attempts: {}",
                        new_donation.treatment_id, attempt, e
                    );
                    return Err(Error::Conflict(format!(
                        "donation to treatment '{}' could not be committed after {} attempts",
                        new_donation.treatment_id, attempt
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }
}
