//! Doctor profiles attached one-to-one to doctor accounts.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ids::{DoctorId, UserId};
use super::user::{EmailAddress, PersonName};

/// Validation errors for doctor profile fields.
#[derive(Debug, Clone, PartialEq)]
pub enum DoctorValidationError {
    UnknownSpecialization { value: String },
    NegativeExperience { value: i32 },
    InvalidFee { value: f64 },
}

impl fmt::Display for DoctorValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSpecialization { value } => write!(
                f,
                "specialization must be one of {} (got '{value}')",
                Specialization::ALL
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Self::NegativeExperience { value } => {
                write!(f, "experience must not be negative (got {value})")
            }
            Self::InvalidFee { value } => {
                write!(f, "consultation fee must be a non-negative amount (got {value})")
            }
        }
    }
}

impl std::error::Error for DoctorValidationError {}

/// Medical specialty offered by a doctor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Specialization {
    Cardiology,
    Dermatology,
    Neurology,
    Pediatrics,
    Orthopedics,
    Ophthalmology,
    Psychiatry,
    General,
}

impl Specialization {
    /// Every specialty in display order.
    pub const ALL: [Self; 8] = [
        Self::Cardiology,
        Self::Dermatology,
        Self::Neurology,
        Self::Pediatrics,
        Self::Orthopedics,
        Self::Ophthalmology,
        Self::Psychiatry,
        Self::General,
    ];

    /// Lowercase wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cardiology => "cardiology",
            Self::Dermatology => "dermatology",
            Self::Neurology => "neurology",
            Self::Pediatrics => "pediatrics",
            Self::Orthopedics => "orthopedics",
            Self::Ophthalmology => "ophthalmology",
            Self::Psychiatry => "psychiatry",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Specialization {
    type Err = DoctorValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == wanted)
            .ok_or_else(|| DoctorValidationError::UnknownSpecialization {
                value: s.to_owned(),
            })
    }
}

/// Professional details supplied when a doctor registers.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorDraft {
    pub specialization: Specialization,
    pub qualification: String,
    pub experience_years: i32,
    pub bio: String,
    pub consultation_fee: f64,
}

impl DoctorDraft {
    /// Validate the numeric fields and trim the free text.
    pub fn new(
        specialization: Specialization,
        qualification: impl Into<String>,
        experience_years: i32,
        bio: impl Into<String>,
        consultation_fee: f64,
    ) -> Result<Self, DoctorValidationError> {
        if experience_years < 0 {
            return Err(DoctorValidationError::NegativeExperience {
                value: experience_years,
            });
        }
        if !consultation_fee.is_finite() || consultation_fee < 0.0 {
            return Err(DoctorValidationError::InvalidFee {
                value: consultation_fee,
            });
        }
        Ok(Self {
            specialization,
            qualification: qualification.into().trim().to_owned(),
            experience_years,
            bio: bio.into().trim().to_owned(),
            consultation_fee,
        })
    }
}

/// Persisted doctor profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Doctor {
    pub id: DoctorId,
    pub user_id: UserId,
    pub specialization: Specialization,
    pub qualification: String,
    pub experience_years: i32,
    pub bio: String,
    pub consultation_fee: f64,
    /// Unavailable doctors are hidden from the public directory.
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Doctor profile joined with the owning account's name and email.
#[derive(Debug, Clone, PartialEq)]
pub struct DoctorProfile {
    pub doctor: Doctor,
    pub name: PersonName,
    pub email: EmailAddress,
}
