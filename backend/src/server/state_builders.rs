//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use patient_monitor::domain::ports::{CredentialRepository, PatientRepository};
use patient_monitor::domain::{
    CredentialLoginService, Error, LoginCredentials, PatientCommandService, PatientQueryService,
};
use patient_monitor::inbound::http::state::HttpState;
use patient_monitor::outbound::memory::InMemoryPatientStore;
use patient_monitor::outbound::persistence::{DieselCredentialRepository, DieselPatientRepository};
use patient_monitor::outbound::security::Pbkdf2PasswordHasher;

use super::ServerConfig;

/// Wire domain services over one pair of repositories and provision the
/// bootstrap personnel account.
async fn wire_services<P, C>(
    patients: Arc<P>,
    credentials: Arc<C>,
    hasher: Arc<Pbkdf2PasswordHasher>,
    personnel: Option<&LoginCredentials>,
) -> Result<HttpState, Error>
where
    P: PatientRepository + 'static,
    C: CredentialRepository + 'static,
{
    let login = Arc::new(CredentialLoginService::new(credentials, hasher.clone()));
    match personnel {
        Some(account) => login.ensure_personnel(account).await?,
        None => warn!("no personnel account configured; only existing logins can sign in"),
    }

    Ok(HttpState::new(
        login,
        Arc::new(PatientQueryService::new(patients.clone())),
        Arc::new(PatientCommandService::new(
            patients,
            hasher,
            Arc::new(DefaultClock),
        )),
    ))
}

/// Build the shared HTTP state, selecting PostgreSQL adapters when a pool is
/// configured and the in-memory store otherwise.
pub(crate) async fn build_http_state(
    config: &ServerConfig,
    hasher: Pbkdf2PasswordHasher,
    personnel: Option<&LoginCredentials>,
) -> Result<web::Data<HttpState>, Error> {
    let hasher = Arc::new(hasher);
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL storage");
            wire_services(
                Arc::new(DieselPatientRepository::new(pool.clone())),
                Arc::new(DieselCredentialRepository::new(pool.clone())),
                hasher,
                personnel,
            )
            .await?
        }
        None => {
            warn!("using in-memory storage; data is lost on restart");
            let store = Arc::new(InMemoryPatientStore::new());
            wire_services(store.clone(), store, hasher, personnel).await?
        }
    };
    Ok(web::Data::new(state))
}
