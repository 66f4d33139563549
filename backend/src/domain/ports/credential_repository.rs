//! Driven port for login credential persistence.

use async_trait::async_trait;

use crate::domain::{Credential, NewCredential};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential repository adapters.
    pub enum CredentialRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "credential repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "credential repository query failed: {message}",
        /// The username is already taken.
        Conflict { message: String } => "credential repository conflict: {message}",
    }
}

/// Port for looking up and creating login credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Find a credential by its exact username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, CredentialRepositoryError>;

    /// Store a credential that is not linked to a patient.
    async fn create(
        &self,
        credential: &NewCredential,
    ) -> Result<Credential, CredentialRepositoryError>;
}
