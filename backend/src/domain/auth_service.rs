//! Credential-backed authentication service.
//!
//! Implements [`LoginService`] over a credential repository and a password
//! hasher, and provisions the bootstrap personnel account at startup.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::patient_service::hash_password;
use crate::domain::ports::{
    CredentialRepository, CredentialRepositoryError, LoginService, PasswordHasher,
};
use crate::domain::{Error, LoginCredentials, NewCredential, PasswordHash, Principal, Role};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const UNKNOWN_USER_PASSWORD: &str = "unknown-user-placeholder";

fn map_credential_error(error: CredentialRepositoryError) -> Error {
    match error {
        CredentialRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("credential repository unavailable: {message}"))
        }
        CredentialRepositoryError::Query { message } => {
            Error::internal(format!("credential repository error: {message}"))
        }
        CredentialRepositoryError::Conflict { message } => Error::conflict(message),
    }
}

async fn verify_password<H>(
    hasher: &Arc<H>,
    password: &str,
    hash: &PasswordHash,
) -> Result<bool, Error>
where
    H: PasswordHasher + 'static,
{
    let hasher = Arc::clone(hasher);
    let password = Zeroizing::new(password.to_owned());
    let hash = hash.clone();
    tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &hash))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

/// Login service verifying stored password hashes.
///
/// Unknown usernames are verified against a placeholder hash made with the
/// same hasher, so a miss costs as much as a wrong password.
#[derive(Clone)]
pub struct CredentialLoginService<C, H> {
    credential_repo: Arc<C>,
    hasher: Arc<H>,
    unknown_user_hash: Arc<OnceCell<PasswordHash>>,
}

impl<C, H> CredentialLoginService<C, H> {
    /// Create a login service over the credential repository and hasher.
    pub fn new(credential_repo: Arc<C>, hasher: Arc<H>) -> Self {
        Self {
            credential_repo,
            hasher,
            unknown_user_hash: Arc::new(OnceCell::new()),
        }
    }
}

impl<C, H> CredentialLoginService<C, H>
where
    C: CredentialRepository,
    H: PasswordHasher + 'static,
{
    /// Make sure a personnel credential named after `credentials` exists.
    ///
    /// An existing credential is left untouched, including its password.
    pub async fn ensure_personnel(&self, credentials: &LoginCredentials) -> Result<(), Error> {
        let existing = self
            .credential_repo
            .find_by_username(credentials.username())
            .await
            .map_err(map_credential_error)?;
        if let Some(credential) = existing {
            if credential.role != Role::Personnel {
                warn!(
                    username = %credential.username,
                    role = %credential.role,
                    "bootstrap personnel username belongs to another role"
                );
                return Err(Error::conflict(
                    "bootstrap personnel username is taken by a non-personnel credential",
                ));
            }
            return Ok(());
        }

        let password_hash = hash_password(&self.hasher, credentials.password()).await?;
        let created = self
            .credential_repo
            .create(&NewCredential {
                username: credentials.username().to_owned(),
                password_hash,
                role: Role::Personnel,
            })
            .await;
        match created {
            Ok(credential) => {
                info!(credential_id = credential.id, "provisioned personnel credential");
                Ok(())
            }
            // Another instance created it first.
            Err(CredentialRepositoryError::Conflict { .. }) => Ok(()),
            Err(err) => Err(map_credential_error(err)),
        }
    }
}

#[async_trait]
impl<C, H> LoginService for CredentialLoginService<C, H>
where
    C: CredentialRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let Some(credential) = self
            .credential_repo
            .find_by_username(credentials.username())
            .await
            .map_err(map_credential_error)?
        else {
            let placeholder = self
                .unknown_user_hash
                .get_or_try_init(|| hash_password(&self.hasher, UNKNOWN_USER_PASSWORD))
                .await?;
            verify_password(&self.hasher, credentials.password(), placeholder).await?;
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches =
            verify_password(&self.hasher, credentials.password(), &credential.password_hash)
                .await?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(Principal::from(&credential))
    }
}
