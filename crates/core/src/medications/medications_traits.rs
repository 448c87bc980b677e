//! Medication repository and service traits.

use async_trait::async_trait;

use super::medications_model::{
    FulfilledRequest, Medication, MedicationRequest, NewMedication, NewMedicationRequest,
};
use crate::errors::Result;
use crate::users::Identity;

#[async_trait]
pub trait MedicationRepositoryTrait: Send + Sync {
    async fn create(&self, medication: Medication) -> Result<Medication>;

    /// Items with stock left, newest first.
    fn list_available(&self) -> Result<Vec<Medication>>;

    /// Loads the item and inserts a pending request in one write transaction.
    async fn open_request(
        &self,
        requester_id: &str,
        new_request: NewMedicationRequest,
    ) -> Result<MedicationRequest>;

    /// Marks the request fulfilled and takes one unit from stock in one
    /// write transaction.
    async fn fulfil_request(&self, request_id: &str) -> Result<FulfilledRequest>;
}

#[async_trait]
pub trait MedicationServiceTrait: Send + Sync {
    fn list_available(&self) -> Result<Vec<Medication>>;

    async fn offer_item(&self, provider: &Identity, new_medication: NewMedication)
        -> Result<Medication>;

    async fn request_item(
        &self,
        requester: &Identity,
        new_request: NewMedicationRequest,
    ) -> Result<MedicationRequest>;

    async fn fulfil_request(&self, caller: &Identity, request_id: &str)
        -> Result<FulfilledRequest>;
}
