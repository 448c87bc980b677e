//! SQLite storage implementation for donations and the funding ledger.

mod model;
mod repository;

pub use model::DonationDB;
pub use repository::DonationRepository;
