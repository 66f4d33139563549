//! Driven port for patient and health record persistence.

use async_trait::async_trait;

use crate::domain::{
    HealthRecord, Patient, PatientFilter, PatientId, PatientRegistration, PatientUpdate,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by patient repository adapters.
    pub enum PatientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "patient repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "patient repository query failed: {message}",
        /// A unique value (personal id or username) is already taken.
        Conflict { message: String } => "patient repository conflict: {message}",
        /// A write referenced a patient that does not exist.
        UnknownPatient { patient_id: i64 } => "patient {patient_id} does not exist",
    }
}

/// Port for reading and writing patients and their health records.
///
/// Every returned [`Patient`] carries all of its health records, most recent
/// first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Patients matching `filter`, ordered by ascending id.
    async fn list(&self, filter: &PatientFilter) -> Result<Vec<Patient>, PatientRepositoryError>;

    /// Look up one patient.
    async fn find_by_id(&self, id: PatientId) -> Result<Option<Patient>, PatientRepositoryError>;

    /// Store a new patient together with its patient-role credential.
    async fn create(
        &self,
        registration: &PatientRegistration,
    ) -> Result<Patient, PatientRepositoryError>;

    /// Apply `update` and return the stored patient, or `None` when absent.
    async fn update(
        &self,
        id: PatientId,
        update: &PatientUpdate,
    ) -> Result<Option<Patient>, PatientRepositoryError>;

    /// Append a health record to its patient.
    ///
    /// Fails with [`PatientRepositoryError::UnknownPatient`] when the owner
    /// does not exist.
    async fn insert_health_record(&self, record: &HealthRecord)
    -> Result<(), PatientRepositoryError>;
}
