//! Patient domain services.
//!
//! `PatientQueryService` answers the read use-cases and
//! `PatientCommandService` registers patients and records symptom checks.
//! Both map repository failures onto domain errors so inbound adapters only
//! ever see [`Error`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::SubsecRound;
use mockable::Clock;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    PasswordHasher, PasswordHasherError, PatientCommand, PatientQuery, PatientRepository,
    PatientRepositoryError,
};
use crate::domain::{
    Error, HealthRecord, NewPatient, PasswordHash, Patient, PatientFilter, PatientId,
    PatientRegistration, PatientUpdate, SymptomCheck,
};

pub(crate) fn map_repository_error(error: PatientRepositoryError) -> Error {
    match error {
        PatientRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("patient repository unavailable: {message}"))
        }
        PatientRepositoryError::Query { message } => {
            Error::internal(format!("patient repository error: {message}"))
        }
        PatientRepositoryError::Conflict { message } => Error::conflict(message),
        PatientRepositoryError::UnknownPatient { patient_id } => {
            Error::not_found(format!("patient {patient_id} not found"))
        }
    }
}

fn patient_not_found(id: PatientId) -> Error {
    Error::not_found(format!("patient {id} not found"))
}

/// Hash `password` on the blocking pool.
pub(crate) async fn hash_password<H>(
    hasher: &Arc<H>,
    password: &str,
) -> Result<PasswordHash, Error>
where
    H: PasswordHasher + 'static,
{
    let hasher = Arc::clone(hasher);
    let password = Zeroizing::new(password.to_owned());
    tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err: PasswordHasherError| Error::internal(err.to_string()))
}

/// Patient service implementing the read driving port.
#[derive(Clone)]
pub struct PatientQueryService<R> {
    patient_repo: Arc<R>,
}

impl<R> PatientQueryService<R> {
    /// Create a new query service over the patient repository.
    pub fn new(patient_repo: Arc<R>) -> Self {
        Self { patient_repo }
    }
}

#[async_trait]
impl<R> PatientQuery for PatientQueryService<R>
where
    R: PatientRepository,
{
    async fn list_patients(&self, filter: PatientFilter) -> Result<Vec<Patient>, Error> {
        let patients = self
            .patient_repo
            .list(&filter)
            .await
            .map_err(map_repository_error)?;
        debug!(
            count = patients.len(),
            older_than = ?filter.age_threshold(),
            "listed patients"
        );
        Ok(patients)
    }

    async fn get_patient(&self, id: PatientId) -> Result<Patient, Error> {
        self.patient_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| patient_not_found(id))
    }
}

/// Patient service implementing the write driving port.
#[derive(Clone)]
pub struct PatientCommandService<R, H> {
    patient_repo: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R, H> PatientCommandService<R, H> {
    /// Create a new command service.
    ///
    /// The clock stamps newly recorded health checks.
    pub fn new(patient_repo: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            patient_repo,
            hasher,
            clock,
        }
    }
}

#[async_trait]
impl<R, H> PatientCommand for PatientCommandService<R, H>
where
    R: PatientRepository,
    H: PasswordHasher + 'static,
{
    async fn register_patient(&self, patient: NewPatient) -> Result<Patient, Error> {
        let NewPatient {
            profile,
            credentials,
        } = patient;
        let password_hash = hash_password(&self.hasher, credentials.password()).await?;
        let registration = PatientRegistration {
            profile,
            username: credentials.username().to_owned(),
            password_hash,
        };

        let created = self
            .patient_repo
            .create(&registration)
            .await
            .map_err(map_repository_error)?;
        info!(patient_id = %created.id(), "registered patient");
        Ok(created)
    }

    async fn update_patient(&self, id: PatientId, update: PatientUpdate) -> Result<Patient, Error> {
        let updated = self
            .patient_repo
            .update(id, &update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| patient_not_found(id))?;
        info!(patient_id = %id, "updated patient");
        Ok(updated)
    }

    async fn record_health_check(
        &self,
        id: PatientId,
        check: SymptomCheck,
    ) -> Result<HealthRecord, Error> {
        // Storage keeps microseconds; the response must match later reads.
        let created_on = self.clock.utc().trunc_subsecs(6);
        let record = HealthRecord::new(id, check, created_on);
        self.patient_repo
            .insert_health_record(&record)
            .await
            .map_err(map_repository_error)?;
        info!(
            patient_id = %id,
            symptoms = check.symptoms.reported_count(),
            "recorded health check"
        );
        Ok(record)
    }
}

#[cfg(test)]
#[path = "patient_service_tests.rs"]
mod tests;
