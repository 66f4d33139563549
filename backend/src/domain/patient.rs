//! Patients enrolled in isolation monitoring.
//!
//! A [`Patient`] owns its health records and keeps them ordered most recent
//! first. Every constructor goes through that ordering so adapters cannot
//! hand out a patient with records in storage order.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::auth::{LoginCredentials, PasswordHash};
use super::health_record::{HealthRecord, sort_most_recent_first};

/// Oldest age accepted for a patient.
pub const AGE_MAX: u32 = 150;

/// Longest personal id accepted; matches the storage column.
pub const PERSONAL_ID_MAX_LEN: usize = 64;
/// Longest name accepted; matches the storage column.
pub const NAME_MAX_LEN: usize = 255;
/// Longest phone number accepted; matches the storage column.
pub const PHONE_MAX_LEN: usize = 32;

/// Validation errors raised while building patients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatientValidationError {
    /// Identifiers are assigned by storage and are always positive.
    #[error("patient id must be a positive integer")]
    InvalidId,
    /// A required text field was blank once trimmed.
    #[error("{field} must not be empty")]
    BlankField { field: &'static str },
    /// A text field exceeded its storage length, counted in characters.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    /// Age outside `0..=AGE_MAX`.
    #[error("age must be at most {max}")]
    AgeOutOfRange { max: u32 },
    /// An update carried no fields.
    #[error("update must change at least one field")]
    EmptyUpdate,
}

impl PatientValidationError {
    /// Name of the offending request field, used for error details.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::BlankField { field } | Self::TooLong { field, .. } => field,
            Self::AgeOutOfRange { .. } => "age",
            Self::EmptyUpdate => "body",
        }
    }
}

/// Storage-assigned patient identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PatientId(i64);

impl PatientId {
    /// Validate a raw identifier.
    ///
    /// # Examples
    /// ```
    /// use patient_monitor::domain::PatientId;
    ///
    /// assert_eq!(PatientId::new(7).map(PatientId::get), Ok(7));
    /// assert!(PatientId::new(0).is_err());
    /// ```
    pub fn new(raw: i64) -> Result<Self, PatientValidationError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(PatientValidationError::InvalidId)
        }
    }

    /// Raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for PatientId {
    type Error = PatientValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PatientId> for i64 {
    fn from(value: PatientId) -> Self {
        value.0
    }
}

/// Age in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Age(u32);

impl Age {
    /// Validate an age in years.
    pub fn new(years: u32) -> Result<Self, PatientValidationError> {
        if years <= AGE_MAX {
            Ok(Self(years))
        } else {
            Err(PatientValidationError::AgeOutOfRange { max: AGE_MAX })
        }
    }

    /// Age in years.
    pub fn years(self) -> u32 {
        self.0
    }

    /// Whether this age strictly exceeds `threshold` years.
    pub fn is_older_than(self, threshold: u32) -> bool {
        self.0 > threshold
    }
}

fn required(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, PatientValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PatientValidationError::BlankField { field });
    }
    if trimmed.chars().count() > max {
        return Err(PatientValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

/// Identity and demographic fields of a patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientProfile {
    personal_id: String,
    name: String,
    phone: String,
    age: Age,
}

impl PatientProfile {
    /// Validate raw profile fields. Text fields are trimmed.
    pub fn try_from_parts(
        personal_id: &str,
        name: &str,
        phone: &str,
        age: u32,
    ) -> Result<Self, PatientValidationError> {
        Ok(Self {
            personal_id: required("personalId", personal_id, PERSONAL_ID_MAX_LEN)?,
            name: required("name", name, NAME_MAX_LEN)?,
            phone: required("phone", phone, PHONE_MAX_LEN)?,
            age: Age::new(age)?,
        })
    }

    /// National or hospital identification number.
    pub fn personal_id(&self) -> &str {
        self.personal_id.as_str()
    }

    /// Full name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact phone number.
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    /// Age in years.
    pub fn age(&self) -> Age {
        self.age
    }

    /// Apply the fields present in `update`.
    pub fn apply(&mut self, update: &PatientUpdate) {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(phone) = &update.phone {
            self.phone.clone_from(phone);
        }
        if let Some(age) = update.age {
            self.age = age;
        }
    }
}

/// A stored patient together with its health records.
///
/// ## Invariants
/// - `health_records` are ordered by creation time, most recent first.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    id: PatientId,
    profile: PatientProfile,
    health_records: Vec<HealthRecord>,
}

impl Patient {
    /// Assemble a patient, ordering `health_records` most recent first.
    pub fn new(id: PatientId, profile: PatientProfile, mut health_records: Vec<HealthRecord>) -> Self {
        sort_most_recent_first(&mut health_records);
        Self {
            id,
            profile,
            health_records,
        }
    }

    /// Storage identifier.
    pub fn id(&self) -> PatientId {
        self.id
    }

    /// Identity and demographic fields.
    pub fn profile(&self) -> &PatientProfile {
        &self.profile
    }

    /// Age shortcut used by filters.
    pub fn age(&self) -> Age {
        self.profile.age
    }

    /// Health records, most recent first.
    pub fn health_records(&self) -> &[HealthRecord] {
        &self.health_records
    }
}

/// Criteria for listing patients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatientFilter {
    older_than: Option<u32>,
}

impl PatientFilter {
    /// Match every patient.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match patients whose age strictly exceeds `years`.
    pub fn older_than(years: u32) -> Self {
        Self {
            older_than: Some(years),
        }
    }

    /// Age threshold, when set.
    pub fn age_threshold(&self) -> Option<u32> {
        self.older_than
    }

    /// Whether `patient` satisfies the filter.
    ///
    /// # Examples
    /// ```
    /// use patient_monitor::domain::{Age, PatientFilter};
    ///
    /// let filter = PatientFilter::older_than(65);
    /// assert!(filter.matches_age(Age::new(66).unwrap()));
    /// assert!(!filter.matches_age(Age::new(65).unwrap()));
    /// ```
    pub fn matches_age(&self, age: Age) -> bool {
        self.older_than
            .is_none_or(|threshold| age.is_older_than(threshold))
    }
}

/// Partial update of a patient's contact fields and age.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientUpdate {
    name: Option<String>,
    phone: Option<String>,
    age: Option<Age>,
}

impl PatientUpdate {
    /// Validate the supplied fields; at least one must be present.
    pub fn try_from_parts(
        name: Option<&str>,
        phone: Option<&str>,
        age: Option<u32>,
    ) -> Result<Self, PatientValidationError> {
        let update = Self {
            name: name
                .map(|value| required("name", value, NAME_MAX_LEN))
                .transpose()?,
            phone: phone
                .map(|value| required("phone", value, PHONE_MAX_LEN))
                .transpose()?,
            age: age.map(Age::new).transpose()?,
        };
        if update.name.is_none() && update.phone.is_none() && update.age.is_none() {
            return Err(PatientValidationError::EmptyUpdate);
        }
        Ok(update)
    }

    /// New name, when changed.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// New phone number, when changed.
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// New age, when changed.
    pub fn age(&self) -> Option<Age> {
        self.age
    }
}

/// Registration request for a new patient and their login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub profile: PatientProfile,
    pub credentials: LoginCredentials,
}

/// Registration ready for storage: the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRegistration {
    pub profile: PatientProfile,
    pub username: String,
    pub password_hash: PasswordHash,
}
