//! Consultation booking between a patient and a doctor.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, Result, ValidationError};
use crate::users::{Identity, Role, User, UserSummary};
use crate::utils::required_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationMode {
    #[default]
    Video,
    Audio,
    Chat,
}

impl ConsultationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationMode::Video => "video",
            ConsultationMode::Audio => "audio",
            ConsultationMode::Chat => "chat",
        }
    }
}

impl FromStr for ConsultationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "video" => Ok(ConsultationMode::Video),
            "audio" => Ok(ConsultationMode::Audio),
            "chat" => Ok(ConsultationMode::Chat),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown consultation mode '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Booking lifecycle. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConsultationStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl ConsultationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsultationStatus::Scheduled => "scheduled",
            ConsultationStatus::Completed => "completed",
            ConsultationStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ConsultationStatus::Scheduled)
    }
}

impl fmt::Display for ConsultationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsultationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "scheduled" => Ok(ConsultationStatus::Scheduled),
            "completed" => Ok(ConsultationStatus::Completed),
            "cancelled" => Ok(ConsultationStatus::Cancelled),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown consultation status '{}'",
                other
            ))
            .into()),
        }
    }
}

/// Domain model representing a booked consultation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Consultation {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub scheduled_at: NaiveDateTime,
    pub mode: ConsultationMode,
    pub status: ConsultationStatus,
    /// Patient and doctor do not share a language, or the patient's is unknown.
    pub needs_translation: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for booking a consultation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewConsultation {
    pub doctor_id: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub mode: Option<ConsultationMode>,
}

impl NewConsultation {
    /// Checks the request shape without touching storage.
    pub fn validate(&self, now: NaiveDateTime) -> Result<()> {
        required_text(self.doctor_id.as_deref(), "doctor_id")?;
        let scheduled_at = self
            .scheduled_at
            .ok_or_else(|| ValidationError::MissingField("scheduled_at".to_string()))?;
        if scheduled_at <= now {
            return Err(ValidationError::InvalidInput(
                "scheduled_at must be in the future".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Requested status change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatusChange {
    pub status: Option<ConsultationStatus>,
}

impl Consultation {
    /// Books `doctor` for the patient. `patient` is the caller's profile, if any.
    pub fn book(
        patient_id: &str,
        patient: Option<&User>,
        doctor: &User,
        new_consultation: NewConsultation,
        now: NaiveDateTime,
    ) -> Result<Self> {
        new_consultation.validate(now)?;
        let patient_id = required_text(Some(patient_id), "patient_id")?;
        let requested_doctor = required_text(new_consultation.doctor_id.as_deref(), "doctor_id")?;
        if doctor.role != Role::Doctor || doctor.id != requested_doctor {
            return Err(ValidationError::InvalidInput(format!(
                "'{}' is not a valid doctor",
                requested_doctor
            ))
            .into());
        }

        let needs_translation = patient.map_or(true, |p| p.language != doctor.language);

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.to_string(),
            doctor_id: doctor.id.clone(),
            scheduled_at: new_consultation
                .scheduled_at
                .ok_or_else(|| ValidationError::MissingField("scheduled_at".to_string()))?,
            mode: new_consultation.mode.unwrap_or_default(),
            status: ConsultationStatus::Scheduled,
            needs_translation,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a status change requested by `actor`.
    ///
    /// The patient, the assigned doctor and admins may change a booking;
    /// patients may only cancel it. On error nothing is changed.
    pub fn change_status(
        &mut self,
        actor: &Identity,
        status: ConsultationStatus,
        now: NaiveDateTime,
    ) -> Result<()> {
        match actor.role {
            Role::Admin => {}
            Role::Doctor if actor.user_id == self.doctor_id => {}
            Role::Patient if actor.user_id == self.patient_id => {
                if status != ConsultationStatus::Cancelled {
                    return Err(ValidationError::InvalidInput(
                        "Patients can only cancel consultations".to_string(),
                    )
                    .into());
                }
            }
            _ => return Err(Error::permission_denied("Not your consultation")),
        }

        if self.status.is_terminal() || status == self.status {
            return Err(ValidationError::InvalidInput(format!(
                "Consultation is already {}",
                self.status
            ))
            .into());
        }

        self.status = status;
        self.updated_at = now;
        Ok(())
    }
}

/// A consultation with the other party's public profile, when it exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsultationView {
    pub consultation: Consultation,
    pub counterpart: Option<UserSummary>,
}
