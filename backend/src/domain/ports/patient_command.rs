//! Driving port for patient write use-cases.

use async_trait::async_trait;

use crate::domain::{Error, HealthRecord, NewPatient, Patient, PatientId, PatientUpdate, SymptomCheck};

/// Domain use-case port for registering patients and recording checks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientCommand: Send + Sync {
    /// Register a patient along with their login.
    async fn register_patient(&self, patient: NewPatient) -> Result<Patient, Error>;

    /// Change a patient's name, phone, or age.
    async fn update_patient(&self, id: PatientId, update: PatientUpdate) -> Result<Patient, Error>;

    /// Record a symptom check for a patient, stamped with the current time.
    async fn record_health_check(
        &self,
        id: PatientId,
        check: SymptomCheck,
    ) -> Result<HealthRecord, Error>;
}
