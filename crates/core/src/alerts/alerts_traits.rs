//! Health alert repository and service traits.

use async_trait::async_trait;

use super::alerts_model::{HealthAlert, NewHealthAlert};
use crate::errors::Result;
use crate::users::Identity;

#[async_trait]
pub trait AlertRepositoryTrait: Send + Sync {
    async fn create(&self, alert: HealthAlert) -> Result<HealthAlert>;

    /// Newest first, optionally limited to one region.
    fn list(&self, region: Option<&str>) -> Result<Vec<HealthAlert>>;
}

#[async_trait]
pub trait AlertServiceTrait: Send + Sync {
    fn list_alerts(&self, region: Option<&str>) -> Result<Vec<HealthAlert>>;

    async fn create_alert(&self, author: &Identity, new_alert: NewHealthAlert)
        -> Result<HealthAlert>;
}
