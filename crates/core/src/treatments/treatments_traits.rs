//! Treatment repository and service traits.
//!
//! These traits define the contract for treatment operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::treatments_model::{NewTreatment, Treatment, TreatmentPublic};
use crate::errors::Result;

/// Trait defining the contract for Treatment repository operations.
///
/// Funding fields are never written through this trait; the donation
/// repository owns every change to `funded_amount` and `status`.
#[async_trait]
pub trait TreatmentRepositoryTrait: Send + Sync {
    /// Persists a freshly created treatment.
    async fn create(&self, treatment: Treatment) -> Result<Treatment>;

    fn get_by_id(&self, treatment_id: &str) -> Result<Option<Treatment>>;

    /// Active treatments joined with their patient's public profile fields,
    /// oldest first.
    fn list_public(&self) -> Result<Vec<TreatmentPublic>>;
}

/// Trait defining the contract for Treatment service operations.
#[async_trait]
pub trait TreatmentServiceTrait: Send + Sync {
    /// Opens a campaign owned by `patient_id`.
    async fn create_treatment(
        &self,
        patient_id: &str,
        new_treatment: NewTreatment,
    ) -> Result<Treatment>;

    fn list_public_treatments(&self) -> Result<Vec<TreatmentPublic>>;
}
