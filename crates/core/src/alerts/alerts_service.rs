use chrono::Utc;
use log::info;
use std::sync::Arc;

use super::alerts_model::{HealthAlert, NewHealthAlert};
use super::alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
use crate::errors::{Error, Result};
use crate::users::{Identity, Role};
use crate::utils::optional_text;

/// Publishes and lists regional health alerts
pub struct AlertService {
    repository: Arc<dyn AlertRepositoryTrait>,
}

impl AlertService {
    pub fn new(repository: Arc<dyn AlertRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl AlertServiceTrait for AlertService {
    fn list_alerts(&self, region: Option<&str>) -> Result<Vec<HealthAlert>> {
        let region = optional_text(region);
        self.repository.list(region.as_deref())
    }

    async fn create_alert(
        &self,
        author: &Identity,
        new_alert: NewHealthAlert,
    ) -> Result<HealthAlert> {
        if !author.has_role(Role::Admin) {
            return Err(Error::permission_denied("Only admins publish alerts"));
        }
        let alert = HealthAlert::create(new_alert, Utc::now().naive_utc())?;
        let created = self.repository.create(alert).await?;
        info!(
            "Health alert {} published for {} ({})",
            created.id,
            created.region,
            created.severity.as_str()
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockAlertRepository {
        alerts: Mutex<Vec<HealthAlert>>,
    }

    #[async_trait::async_trait]
    impl AlertRepositoryTrait for MockAlertRepository {
        async fn create(&self, alert: HealthAlert) -> Result<HealthAlert> {
            self.alerts.lock().unwrap().push(alert.clone());
            Ok(alert)
        }

        fn list(&self, region: Option<&str>) -> Result<Vec<HealthAlert>> {
            Ok(self
                .alerts
                .lock()
                .unwrap()
                .iter()
                .rev()
                .filter(|a| region.map_or(true, |r| a.region == r))
                .cloned()
                .collect())
        }
    }

    fn alert(region: &str) -> NewHealthAlert {
        NewHealthAlert {
            title: Some("Heat wave".to_string()),
            content: Some("Stay hydrated.".to_string()),
            region: Some(region.to_string()),
            severity: None,
        }
    }

    #[tokio::test]
    async fn test_only_admin_publishes() {
        let repository = Arc::new(MockAlertRepository::default());
        let service = AlertService::new(repository.clone());
        let err = service
            .create_alert(&Identity::new("ngo-1", Role::Ngo), alert("Rafah"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied(_)));
        assert!(repository.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_region_filter_lists_everything() {
        let service = AlertService::new(Arc::new(MockAlertRepository::default()));
        let admin = Identity::new("admin-1", Role::Admin);
        service.create_alert(&admin, alert("Rafah")).await.unwrap();
        service.create_alert(&admin, alert("Gaza City")).await.unwrap();

        assert_eq!(service.list_alerts(Some("Rafah")).unwrap().len(), 1);
        assert_eq!(service.list_alerts(Some("  ")).unwrap().len(), 2);
        assert_eq!(service.list_alerts(None).unwrap()[0].region, "Gaza City");
    }
}
