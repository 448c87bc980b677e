//! User profile and caller identity models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{USER_EMAIL_MAX_LEN, USER_NAME_MAX_LEN, USER_PHONE_MAX_LEN};
use crate::errors::{Error, Result, ValidationError};
use crate::utils::{check_max_len, required_text};

/// Role attached to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Patient,
    Doctor,
    Donor,
    Ngo,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Donor => "donor",
            Role::Ngo => "ngo",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "donor" => Ok(Role::Donor),
            "ngo" => Ok(Role::Ngo),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::InvalidInput(format!("Unknown role '{}'", other)).into()),
        }
    }
}

/// Preferred interface language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ar => "ar",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ar" => Ok(Language::Ar),
            "en" => Ok(Language::En),
            other => {
                Err(ValidationError::InvalidInput(format!("Unknown language '{}'", other)).into())
            }
        }
    }
}

/// The authenticated caller, as vouched for by the identity provider.
///
/// The ledger never authenticates anyone itself; it trusts the id and role
/// carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// Domain model representing a user profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub language: Language,
    pub verified: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Public part of a profile shown to the other side of a booking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub language: Language,
}

/// Input model for registering a user profile.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub language: Language,
}

impl NewUser {
    /// Validates the registration data.
    pub fn validate(&self) -> Result<()> {
        let name = required_text(self.name.as_deref(), "name")?;
        check_max_len(name, "name", USER_NAME_MAX_LEN)?;

        let email = required_text(self.email.as_deref(), "email")?;
        if email.len() > USER_EMAIL_MAX_LEN || !looks_like_email(email) {
            return Err(ValidationError::InvalidInput(format!("Invalid email '{}'", email)).into());
        }

        if let Some(phone) = self.phone.as_deref() {
            check_max_len(phone.trim(), "phone", USER_PHONE_MAX_LEN)?;
        }

        if self.role == Role::Admin {
            return Err(ValidationError::InvalidInput(
                "admin accounts cannot be self-registered".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
