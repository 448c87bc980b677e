//! Medicine and equipment listings and the requests made against them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{DELIVERY_ADDRESS_MAX_LEN, MEDICATION_MAX_QUANTITY, MEDICATION_NAME_MAX_LEN};
use crate::errors::{Error, Result, ValidationError};
use crate::users::{Identity, Role};
use crate::utils::{check_max_len, optional_text, required_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MedicationCategory {
    #[default]
    Medicine,
    Equipment,
}

impl MedicationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MedicationCategory::Medicine => "medicine",
            MedicationCategory::Equipment => "equipment",
        }
    }
}

impl FromStr for MedicationCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "medicine" => Ok(MedicationCategory::Medicine),
            "equipment" => Ok(MedicationCategory::Equipment),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown medication category '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Who stocks a listing. Derived from the caller's role, never from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Pharmacy,
    Ngo,
    Donor,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::Pharmacy => "pharmacy",
            ProviderType::Ngo => "ngo",
            ProviderType::Donor => "donor",
        }
    }

    /// Admins list stock on behalf of partner pharmacies.
    pub fn for_role(role: Role) -> Result<Self> {
        match role {
            Role::Admin => Ok(ProviderType::Pharmacy),
            Role::Ngo => Ok(ProviderType::Ngo),
            Role::Donor => Ok(ProviderType::Donor),
            other => Err(Error::permission_denied(format!(
                "{} accounts cannot list medications",
                other
            ))),
        }
    }
}

impl FromStr for ProviderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pharmacy" => Ok(ProviderType::Pharmacy),
            "ngo" => Ok(ProviderType::Ngo),
            "donor" => Ok(ProviderType::Donor),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown provider type '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Fulfilled,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Fulfilled => "fulfilled",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(RequestStatus::Pending),
            "fulfilled" => Ok(RequestStatus::Fulfilled),
            "cancelled" => Ok(RequestStatus::Cancelled),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown request status '{}'",
                other
            ))
            .into()),
        }
    }
}

/// A stocked medicine or piece of equipment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Units on hand; never negative.
    pub quantity: i32,
    pub category: MedicationCategory,
    pub provider_type: ProviderType,
    pub provider_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewMedication {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub category: Option<MedicationCategory>,
}

impl NewMedication {
    pub fn validate(&self) -> Result<()> {
        let name = required_text(self.name.as_deref(), "name")?;
        check_max_len(name, "name", MEDICATION_NAME_MAX_LEN)?;
        let quantity = self
            .quantity
            .ok_or_else(|| ValidationError::MissingField("quantity".to_string()))?;
        if !(1..=MEDICATION_MAX_QUANTITY).contains(&quantity) {
            return Err(ValidationError::InvalidInput(format!(
                "quantity must be between 1 and {}",
                MEDICATION_MAX_QUANTITY
            ))
            .into());
        }
        Ok(())
    }
}

impl Medication {
    /// Lists new stock provided by `provider`.
    pub fn offer(provider: &Identity, new_medication: NewMedication, now: NaiveDateTime) -> Result<Self> {
        let provider_type = ProviderType::for_role(provider.role)?;
        new_medication.validate()?;
        let name = required_text(new_medication.name.as_deref(), "name")?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: optional_text(new_medication.description.as_deref()),
            quantity: new_medication.quantity.unwrap_or_default(),
            category: new_medication.category.unwrap_or_default(),
            provider_type,
            provider_id: provider.user_id.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

/// A request for one unit of a listed item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRequest {
    pub id: String,
    pub requester_id: String,
    pub medication_id: String,
    pub delivery_address: Option<String>,
    pub status: RequestStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewMedicationRequest {
    pub medication_id: Option<String>,
    pub delivery_address: Option<String>,
}

impl NewMedicationRequest {
    pub fn validate(&self) -> Result<()> {
        required_text(self.medication_id.as_deref(), "medication_id")?;
        if let Some(address) = optional_text(self.delivery_address.as_deref()) {
            check_max_len(&address, "delivery_address", DELIVERY_ADDRESS_MAX_LEN)?;
        }
        Ok(())
    }
}

impl MedicationRequest {
    /// Opens a pending request against `medication`, which must be in stock.
    pub fn open(
        requester_id: &str,
        medication: &Medication,
        new_request: &NewMedicationRequest,
        now: NaiveDateTime,
    ) -> Result<Self> {
        new_request.validate()?;
        let requester_id = required_text(Some(requester_id), "requester_id")?;
        if new_request.medication_id.as_deref().map(str::trim) != Some(medication.id.as_str()) {
            return Err(ValidationError::InvalidInput(format!(
                "Request for another item applied to medication '{}'",
                medication.id
            ))
            .into());
        }
        if !medication.is_available() {
            return Err(ValidationError::InvalidInput(format!(
                "'{}' is out of stock",
                medication.name
            ))
            .into());
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            requester_id: requester_id.to_string(),
            medication_id: medication.id.clone(),
            delivery_address: optional_text(new_request.delivery_address.as_deref()),
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Hands out one unit of `medication`. Both values must be saved together;
    /// on error neither is changed.
    pub fn fulfil(&mut self, medication: &mut Medication, now: NaiveDateTime) -> Result<()> {
        if self.medication_id != medication.id {
            return Err(ValidationError::InvalidInput(format!(
                "Request '{}' is not for medication '{}'",
                self.id, medication.id
            ))
            .into());
        }
        if self.status != RequestStatus::Pending {
            return Err(ValidationError::InvalidInput(format!(
                "Request is already {}",
                self.status
            ))
            .into());
        }
        if !medication.is_available() {
            return Err(ValidationError::InvalidInput(format!(
                "'{}' is out of stock",
                medication.name
            ))
            .into());
        }

        medication.quantity -= 1;
        medication.updated_at = now;
        self.status = RequestStatus::Fulfilled;
        self.updated_at = now;
        Ok(())
    }
}

/// A fulfilled request and the stock left after it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FulfilledRequest {
    pub request: MedicationRequest,
    pub medication: Medication,
}
