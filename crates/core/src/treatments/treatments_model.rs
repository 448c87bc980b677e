//! Treatment aggregate: a patient's funding campaign.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{AMOUNT_SCALE, MAX_AMOUNT, TREATMENT_TITLE_MAX_LEN};
use crate::errors::{Error, Result, ValidationError};
use crate::users::Language;
use crate::utils::{check_max_len, max_amount, normalize_amount, required_text};

/// Funding lifecycle. `Active -> Funded` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentStatus {
    #[default]
    Active,
    Funded,
    Completed,
}

impl TreatmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentStatus::Active => "active",
            TreatmentStatus::Funded => "funded",
            TreatmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TreatmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TreatmentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(TreatmentStatus::Active),
            "funded" => Ok(TreatmentStatus::Funded),
            "completed" => Ok(TreatmentStatus::Completed),
            other => Err(
                ValidationError::InvalidInput(format!("Unknown treatment status '{}'", other))
                    .into(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentCategory {
    Surgery,
    Cancer,
    Dialysis,
    Rehabilitation,
    #[default]
    Other,
}

impl TreatmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentCategory::Surgery => "surgery",
            TreatmentCategory::Cancer => "cancer",
            TreatmentCategory::Dialysis => "dialysis",
            TreatmentCategory::Rehabilitation => "rehabilitation",
            TreatmentCategory::Other => "other",
        }
    }
}

impl FromStr for TreatmentCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "surgery" => Ok(TreatmentCategory::Surgery),
            "cancer" => Ok(TreatmentCategory::Cancer),
            "dialysis" => Ok(TreatmentCategory::Dialysis),
            "rehabilitation" => Ok(TreatmentCategory::Rehabilitation),
            "other" => Ok(TreatmentCategory::Other),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown treatment category '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Domain model representing a treatment funding campaign.
///
/// `funded_amount` always equals the sum of the treatment's donations once a
/// donation has been committed. Only [`Treatment::apply_donation`] changes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Treatment {
    pub id: String,
    pub patient_id: String,
    pub title: String,
    pub description: String,
    pub category: TreatmentCategory,
    pub goal_amount: Decimal,
    pub funded_amount: Decimal,
    pub status: TreatmentStatus,
    pub consent_given: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for opening a treatment campaign.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewTreatment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<TreatmentCategory>,
    /// JSON numbers are read from their source digits, never through `f64`.
    #[serde(
        default,
        deserialize_with = "rust_decimal::serde::arbitrary_precision_option::deserialize"
    )]
    pub goal_amount: Option<Decimal>,
    #[serde(default)]
    pub consent_given: bool,
}

impl Treatment {
    /// Opens a new campaign for `patient_id` with nothing funded yet.
    pub fn create(patient_id: &str, new_treatment: NewTreatment, now: NaiveDateTime) -> Result<Self> {
        let patient_id = required_text(Some(patient_id), "patient_id")?;
        let title = required_text(new_treatment.title.as_deref(), "title")?;
        check_max_len(title, "title", TREATMENT_TITLE_MAX_LEN)?;
        let description = required_text(new_treatment.description.as_deref(), "description")?;
        let goal_amount = new_treatment
            .goal_amount
            .ok_or_else(|| ValidationError::MissingField("goal_amount".to_string()))?;
        let goal_amount = normalize_amount("goal_amount", goal_amount)?;

        let mut funded_amount = Decimal::ZERO;
        funded_amount.rescale(AMOUNT_SCALE);

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category: new_treatment.category.unwrap_or_default(),
            goal_amount,
            funded_amount,
            status: TreatmentStatus::Active,
            consent_given: new_treatment.consent_given,
            created_at: now,
            updated_at: now,
        })
    }

    /// Adds a committed donation to the running total.
    ///
    /// Must be called exactly once per donation, inside the transaction that
    /// inserts the donation row.
    pub fn apply_donation(&mut self, amount: Decimal, now: NaiveDateTime) -> Result<()> {
        let amount = normalize_amount("amount", amount)?;
        if self.status == TreatmentStatus::Completed {
            return Err(ValidationError::InvalidInput(format!(
                "Treatment '{}' is completed and no longer accepts donations",
                self.id
            ))
            .into());
        }

        let new_total = self
            .funded_amount
            .checked_add(amount)
            .filter(|total| *total <= max_amount())
            .ok_or_else(|| {
                ValidationError::invalid_amount(
                    "amount",
                    format!("funded total would exceed {}", MAX_AMOUNT),
                )
            })?;

        self.funded_amount = new_total;
        if self.status == TreatmentStatus::Active && self.funded_amount >= self.goal_amount {
            self.status = TreatmentStatus::Funded;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Patient details exposed on the public listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientSummary {
    pub name: String,
    pub language: Language,
}

/// Public view of an active campaign.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreatmentPublic {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: TreatmentCategory,
    pub goal_amount: Decimal,
    pub funded_amount: Decimal,
    pub status: TreatmentStatus,
    pub patient: Option<PatientSummary>,
}

impl TreatmentPublic {
    pub fn from_treatment(treatment: Treatment, patient: Option<PatientSummary>) -> Self {
        Self {
            id: treatment.id,
            title: treatment.title,
            description: treatment.description,
            category: treatment.category,
            goal_amount: treatment.goal_amount,
            funded_amount: treatment.funded_amount,
            status: treatment.status,
            patient,
        }
    }
}
