//! Public health alerts published by administrators.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{ALERT_REGION_MAX_LEN, ALERT_TITLE_MAX_LEN};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::{check_max_len, required_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    #[default]
    Medium,
    High,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "low",
            AlertSeverity::Medium => "medium",
            AlertSeverity::High => "high",
        }
    }
}

impl FromStr for AlertSeverity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(AlertSeverity::Low),
            "medium" => Ok(AlertSeverity::Medium),
            "high" => Ok(AlertSeverity::High),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown alert severity '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthAlert {
    pub id: String,
    pub title: String,
    pub content: String,
    pub region: String,
    pub severity: AlertSeverity,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewHealthAlert {
    pub title: Option<String>,
    pub content: Option<String>,
    pub region: Option<String>,
    pub severity: Option<AlertSeverity>,
}

impl HealthAlert {
    pub fn create(new_alert: NewHealthAlert, now: NaiveDateTime) -> Result<Self> {
        let title = required_text(new_alert.title.as_deref(), "title")?;
        check_max_len(title, "title", ALERT_TITLE_MAX_LEN)?;
        let content = required_text(new_alert.content.as_deref(), "content")?;
        let region = required_text(new_alert.region.as_deref(), "region")?;
        check_max_len(region, "region", ALERT_REGION_MAX_LEN)?;

        Ok(Self {
            id: uuid::Uuid::now_v7().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            region: region.to_string(),
            severity: new_alert.severity.unwrap_or_default(),
            created_at: now,
        })
    }
}
