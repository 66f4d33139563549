//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, PatientCommand, PatientQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub patients: Arc<dyn PatientQuery>,
    pub patients_command: Arc<dyn PatientCommand>,
}

impl HttpState {
    /// Construct state from the driving ports.
    pub fn new(
        login: Arc<dyn LoginService>,
        patients: Arc<dyn PatientQuery>,
        patients_command: Arc<dyn PatientCommand>,
    ) -> Self {
        Self {
            login,
            patients,
            patients_command,
        }
    }
}
