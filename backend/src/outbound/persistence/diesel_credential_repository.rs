//! PostgreSQL-backed `CredentialRepository` implementation.
//!
//! Patient credentials are linked from `patients.credential_id`; lookups
//! left-join the patients table to fill [`Credential::patient_id`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CredentialRepository, CredentialRepositoryError};
use crate::domain::{Credential, NewCredential, PasswordHash, PatientId, Role};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, pool_error_message, unique_violation_message,
};
use super::models::{CredentialRow, NewCredentialRow};
use super::pool::{DbPool, PoolError};
use super::schema::{credentials, patients};

/// Diesel-backed implementation of the credential repository port.
#[derive(Clone)]
pub struct DieselCredentialRepository {
    pool: DbPool,
}

impl DieselCredentialRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CredentialRepositoryError {
    CredentialRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> CredentialRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => CredentialRepositoryError::connection(message),
        DieselFailure::UniqueViolation { constraint } => {
            CredentialRepositoryError::conflict(unique_violation_message(constraint.as_deref()))
        }
        DieselFailure::Query(message) => CredentialRepositoryError::query(message),
        DieselFailure::ForeignKeyViolation { .. } => {
            CredentialRepositoryError::query("foreign key violation")
        }
    }
}

fn row_to_credential(
    row: CredentialRow,
    patient_id: Option<i64>,
) -> Result<Credential, CredentialRepositoryError> {
    let role: Role = row
        .role
        .parse()
        .map_err(|err: crate::domain::UnknownRoleError| {
            CredentialRepositoryError::query(err.to_string())
        })?;
    let patient_id = patient_id
        .map(PatientId::new)
        .transpose()
        .map_err(|err| CredentialRepositoryError::query(err.to_string()))?;
    Ok(Credential {
        id: row.id,
        username: row.username,
        password_hash: PasswordHash::new(row.password_hash),
        role,
        patient_id,
    })
}

#[async_trait]
impl CredentialRepository for DieselCredentialRepository {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, CredentialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = credentials::table
            .left_join(patients::table)
            .filter(credentials::username.eq(username))
            .select((CredentialRow::as_select(), patients::id.nullable()))
            .first::<(CredentialRow, Option<i64>)>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(row, patient_id)| row_to_credential(row, patient_id))
            .transpose()
    }

    async fn create(
        &self,
        credential: &NewCredential,
    ) -> Result<Credential, CredentialRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::insert_into(credentials::table)
            .values(&NewCredentialRow {
                username: credential.username.as_str(),
                password_hash: credential.password_hash.as_str(),
                role: credential.role.as_str(),
            })
            .returning(CredentialRow::as_returning())
            .get_result::<CredentialRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_credential(row, None)
    }
}
