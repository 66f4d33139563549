//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`PatientQuery`, `PatientCommand`, `LoginService`) are called
//! by inbound adapters. Driven ports (repositories, password hashing) are
//! implemented by outbound adapters and expose typed errors that services map
//! onto [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod credential_repository;
mod login_service;
mod password_hasher;
mod patient_command;
mod patient_query;
mod patient_repository;

#[cfg(test)]
pub use credential_repository::MockCredentialRepository;
pub use credential_repository::{CredentialRepository, CredentialRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use patient_command::MockPatientCommand;
pub use patient_command::PatientCommand;
#[cfg(test)]
pub use patient_query::MockPatientQuery;
pub use patient_query::PatientQuery;
#[cfg(test)]
pub use patient_repository::MockPatientRepository;
pub use patient_repository::{PatientRepository, PatientRepositoryError};
