//! Authentication primitives: login credentials, roles, and the principal
//! stored in a session once a login succeeds.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::patient::PatientId;

/// Longest username accepted; matches the storage column.
pub const USERNAME_MAX_LEN: usize = 64;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX_LEN`] characters.
    UsernameTooLong,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong => {
                write!(f, "username must be at most {USERNAME_MAX_LEN} characters")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl LoginValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::UsernameTooLong => "username",
            Self::EmptyPassword => "password",
        }
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace.
///
/// # Examples
/// ```
/// use patient_monitor::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("nurse", "password").unwrap();
/// assert_eq!(creds.username(), "nurse");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if normalized.chars().count() > USERNAME_MAX_LEN {
            return Err(LoginValidationError::UsernameTooLong);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for credential lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Access role attached to a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Medical staff: may read and manage every patient.
    Personnel,
    /// A patient: may only report their own health checks.
    Patient,
}

impl Role {
    /// Storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Personnel => "PERSONNEL",
            Self::Patient => "PATIENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored role string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRoleError(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PERSONNEL" => Ok(Self::Personnel),
            "PATIENT" => Ok(Self::Patient),
            other => Err(UnknownRoleError(other.to_owned())),
        }
    }
}

/// Encoded password hash as produced by a password hasher adapter.
///
/// The encoding is opaque to the domain. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded representation for storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Stored login credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: i64,
    pub username: String,
    pub password_hash: PasswordHash,
    pub role: Role,
    /// Patient linked to a [`Role::Patient`] credential.
    pub patient_id: Option<PatientId>,
}

/// Credential to be stored, with the password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub username: String,
    pub password_hash: PasswordHash,
    pub role: Role,
}

/// Authenticated caller persisted in the session.
///
/// # Examples
/// ```
/// use patient_monitor::domain::{PatientId, Principal, Role};
///
/// let own = PatientId::new(3).unwrap();
/// let patient = Principal::new(9, Role::Patient, Some(own));
/// assert!(patient.can_report_for(own));
/// assert!(!patient.can_report_for(PatientId::new(4).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    credential_id: i64,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    patient_id: Option<PatientId>,
}

impl Principal {
    /// Build a principal for an authenticated credential.
    pub fn new(credential_id: i64, role: Role, patient_id: Option<PatientId>) -> Self {
        Self {
            credential_id,
            role,
            patient_id,
        }
    }

    /// Identifier of the credential that logged in.
    pub fn credential_id(&self) -> i64 {
        self.credential_id
    }

    /// Access role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Linked patient for patient logins.
    pub fn patient_id(&self) -> Option<PatientId> {
        self.patient_id
    }

    /// Whether this principal may record a health check for `patient_id`.
    pub fn can_report_for(&self, patient_id: PatientId) -> bool {
        match self.role {
            Role::Personnel => true,
            Role::Patient => self.patient_id == Some(patient_id),
        }
    }
}

impl From<&Credential> for Principal {
    fn from(value: &Credential) -> Self {
        Self::new(value.id, value.role, value.patient_id)
    }
}
