//! In-memory adapter implementing the patient and credential repositories.
//!
//! Used when no database is configured in development builds and by the
//! HTTP integration tests. Behaviour mirrors the Diesel adapters: ids are
//! assigned sequentially from 1, personal ids and usernames are unique, and
//! listings come back in ascending id order.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    CredentialRepository, CredentialRepositoryError, PatientRepository, PatientRepositoryError,
};
use crate::domain::{
    Credential, HealthRecord, NewCredential, PasswordHash, Patient, PatientFilter, PatientId,
    PatientProfile, PatientRegistration, PatientUpdate, Role,
};

#[derive(Debug, Default)]
struct StoreState {
    last_patient_id: i64,
    last_credential_id: i64,
    patients: BTreeMap<i64, PatientProfile>,
    credentials: BTreeMap<i64, Credential>,
    records: Vec<HealthRecord>,
}

impl StoreState {
    fn username_taken(&self, username: &str) -> bool {
        self.credentials
            .values()
            .any(|credential| credential.username == username)
    }

    fn insert_credential(
        &mut self,
        username: &str,
        password_hash: &PasswordHash,
        role: Role,
    ) -> Credential {
        self.last_credential_id += 1;
        let credential = Credential {
            id: self.last_credential_id,
            username: username.to_owned(),
            password_hash: password_hash.clone(),
            role,
            patient_id: None,
        };
        self.credentials.insert(credential.id, credential.clone());
        credential
    }

    fn assemble(
        &self,
        id: i64,
        profile: &PatientProfile,
    ) -> Result<Patient, PatientRepositoryError> {
        let patient_id =
            PatientId::new(id).map_err(|err| PatientRepositoryError::query(err.to_string()))?;
        let records = self
            .records
            .iter()
            .filter(|record| record.patient_id() == patient_id)
            .cloned()
            .collect();
        Ok(Patient::new(patient_id, profile.clone(), records))
    }
}

/// Thread-safe in-memory patient store.
#[derive(Debug, Default)]
pub struct InMemoryPatientStore {
    state: Mutex<StoreState>,
}

impl InMemoryPatientStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, String> {
        self.state
            .lock()
            .map_err(|_| "in-memory patient store lock poisoned".to_owned())
    }
}

#[async_trait]
impl PatientRepository for InMemoryPatientStore {
    async fn list(&self, filter: &PatientFilter) -> Result<Vec<Patient>, PatientRepositoryError> {
        let state = self.lock().map_err(PatientRepositoryError::query)?;
        state
            .patients
            .iter()
            .filter(|(_, profile)| filter.matches_age(profile.age()))
            .map(|(id, profile)| state.assemble(*id, profile))
            .collect()
    }

    async fn find_by_id(&self, id: PatientId) -> Result<Option<Patient>, PatientRepositoryError> {
        let state = self.lock().map_err(PatientRepositoryError::query)?;
        state
            .patients
            .get(&id.get())
            .map(|profile| state.assemble(id.get(), profile))
            .transpose()
    }

    async fn create(
        &self,
        registration: &PatientRegistration,
    ) -> Result<Patient, PatientRepositoryError> {
        let mut state = self.lock().map_err(PatientRepositoryError::query)?;
        let personal_id = registration.profile.personal_id();
        if state
            .patients
            .values()
            .any(|profile| profile.personal_id() == personal_id)
        {
            return Err(PatientRepositoryError::conflict(
                "personal id already registered",
            ));
        }
        if state.username_taken(&registration.username) {
            return Err(PatientRepositoryError::conflict("username already registered"));
        }

        let credential_id = state
            .insert_credential(
                &registration.username,
                &registration.password_hash,
                Role::Patient,
            )
            .id;
        state.last_patient_id += 1;
        let id = state.last_patient_id;
        let patient_id =
            PatientId::new(id).map_err(|err| PatientRepositoryError::query(err.to_string()))?;
        if let Some(credential) = state.credentials.get_mut(&credential_id) {
            credential.patient_id = Some(patient_id);
        }
        state.patients.insert(id, registration.profile.clone());
        Ok(Patient::new(patient_id, registration.profile.clone(), Vec::new()))
    }

    async fn update(
        &self,
        id: PatientId,
        update: &PatientUpdate,
    ) -> Result<Option<Patient>, PatientRepositoryError> {
        let mut state = self.lock().map_err(PatientRepositoryError::query)?;
        let Some(profile) = state.patients.get_mut(&id.get()) else {
            return Ok(None);
        };
        profile.apply(update);
        let state = &*state;
        state
            .patients
            .get(&id.get())
            .map(|profile| state.assemble(id.get(), profile))
            .transpose()
    }

    async fn insert_health_record(
        &self,
        record: &HealthRecord,
    ) -> Result<(), PatientRepositoryError> {
        let mut state = self.lock().map_err(PatientRepositoryError::query)?;
        let owner = record.patient_id().get();
        if !state.patients.contains_key(&owner) {
            return Err(PatientRepositoryError::unknown_patient(owner));
        }
        state.records.push(record.clone());
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryPatientStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Credential>, CredentialRepositoryError> {
        let state = self.lock().map_err(CredentialRepositoryError::query)?;
        Ok(state
            .credentials
            .values()
            .find(|credential| credential.username == username)
            .cloned())
    }

    async fn create(
        &self,
        credential: &NewCredential,
    ) -> Result<Credential, CredentialRepositoryError> {
        let mut state = self.lock().map_err(CredentialRepositoryError::query)?;
        if state.username_taken(&credential.username) {
            return Err(CredentialRepositoryError::conflict(
                "username already registered",
            ));
        }
        Ok(state.insert_credential(
            &credential.username,
            &credential.password_hash,
            credential.role,
        ))
    }
}
