//! Donations module - the recorder that couples each donation to its treatment.

mod donations_model;
mod donations_service;
mod donations_traits;

#[cfg(test)]
mod donations_service_tests;

pub use donations_model::{Donation, DonationReceipt, LedgerEntry, NewDonation, TreatmentLedger};
pub use donations_service::DonationService;
pub use donations_traits::{DonationRepositoryTrait, DonationServiceTrait};
