use super::transparency_model::TransparencyReport;
use crate::errors::Result;

/// Trait defining the contract for the transparency projector.
pub trait TransparencyServiceTrait: Send + Sync {
    /// Builds the public funding report for a treatment.
    ///
    /// Returns `Error::NotFound` when the treatment does not exist.
    fn transparency_report(&self, treatment_id: &str) -> Result<TransparencyReport>;
}
