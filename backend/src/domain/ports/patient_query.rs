//! Driving port for patient read use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Patient, PatientFilter, PatientId};

/// Domain use-case port for reading patients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientQuery: Send + Sync {
    /// Patients matching `filter`, each with records most recent first.
    async fn list_patients(&self, filter: PatientFilter) -> Result<Vec<Patient>, Error>;

    /// One patient, or a `not_found` error.
    async fn get_patient(&self, id: PatientId) -> Result<Patient, Error>;
}
