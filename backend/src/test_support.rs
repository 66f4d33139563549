//! Test utilities shared by unit and integration tests.
//!
//! Compiled with the `test-support` feature. [`InMemoryBackend`] wires the
//! real domain services over the in-memory store so HTTP scenarios exercise
//! the same code paths as the server, minus PostgreSQL.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use mockable::{Clock, DefaultClock};

use crate::Trace;
use crate::domain::{
    CredentialLoginService, Error, LoginCredentials, PatientCommandService, PatientQueryService,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::test_utils::test_session_middleware;
use crate::inbound::http::{self, health};
use crate::outbound::memory::InMemoryPatientStore;
use crate::outbound::security::Pbkdf2PasswordHasher;

/// PBKDF2 rounds used by tests; low enough to keep suites fast.
pub const TEST_HASH_ITERATIONS: u32 = 2;

/// Domain services wired over one shared in-memory store.
pub struct InMemoryBackend {
    /// Store backing every repository port; tests may seed it directly.
    pub store: Arc<InMemoryPatientStore>,
    login: Arc<CredentialLoginService<InMemoryPatientStore, Pbkdf2PasswordHasher>>,
    state: HttpState,
}

impl InMemoryBackend {
    /// Wire services using the system clock.
    pub fn new() -> Result<Self, Error> {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Wire services using `clock` to timestamp health records.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Result<Self, Error> {
        let store = Arc::new(InMemoryPatientStore::new());
        let hasher = Arc::new(
            Pbkdf2PasswordHasher::with_iterations(TEST_HASH_ITERATIONS)
                .map_err(|err| Error::internal(err.to_string()))?,
        );
        let login = Arc::new(CredentialLoginService::new(store.clone(), hasher.clone()));
        let state = HttpState::new(
            login.clone(),
            Arc::new(PatientQueryService::new(store.clone())),
            Arc::new(PatientCommandService::new(store.clone(), hasher, clock)),
        );
        Ok(Self {
            store,
            login,
            state,
        })
    }

    /// Create a personnel login.
    pub async fn add_personnel(&self, username: &str, password: &str) -> Result<(), Error> {
        let credentials = LoginCredentials::try_from_parts(username, password)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.login.ensure_personnel(&credentials).await
    }

    /// Handler state backed by this backend.
    pub fn state(&self) -> HttpState {
        self.state.clone()
    }

    /// Build an application mirroring the server's routing.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let health_state = web::Data::new(health::HealthState::new());
        health_state.mark_ready();
        App::new()
            .app_data(web::Data::new(self.state()))
            .app_data(health_state)
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .wrap(test_session_middleware())
                    .configure(http::configure),
            )
            .service(health::ready)
            .service(health::live)
    }
}
