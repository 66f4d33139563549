//! Domain primitives, aggregates, and services.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters, plus the services implementing the driving ports. Types validate
//! their invariants on construction.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Patient, HealthRecord and their value types.
//! - LoginCredentials, Role, Principal: authentication primitives.
//! - PatientQueryService, PatientCommandService, CredentialLoginService.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod health_record;
pub mod patient;
pub mod patient_service;
pub mod ports;
pub mod trace_id;

pub use self::auth::{
    Credential, LoginCredentials, LoginValidationError, NewCredential, PasswordHash, Principal,
    Role, USERNAME_MAX_LEN, UnknownRoleError,
};
pub use self::auth_service::CredentialLoginService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::health_record::{
    HealthRecord, HealthRecordValidationError, SymptomCheck, Symptoms, TEMPERATURE_MAX_CELSIUS,
    TEMPERATURE_MIN_CELSIUS, Temperature, sort_most_recent_first,
};
pub use self::patient::{
    AGE_MAX, Age, NAME_MAX_LEN, NewPatient, PERSONAL_ID_MAX_LEN, PHONE_MAX_LEN, Patient,
    PatientFilter, PatientId, PatientProfile, PatientRegistration, PatientUpdate,
    PatientValidationError,
};
pub use self::patient_service::{PatientCommandService, PatientQueryService};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use patient_monitor::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("personnel only"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
