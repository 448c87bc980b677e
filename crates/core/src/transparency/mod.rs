//! Transparency module - public, read-only funding reports.

mod transparency_model;
mod transparency_service;
mod transparency_traits;

pub use transparency_model::{DonationEntry, TransparencyReport, TreatmentSummary};
pub use transparency_service::TransparencyService;
pub use transparency_traits::TransparencyServiceTrait;
