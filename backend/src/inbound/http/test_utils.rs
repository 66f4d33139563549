//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

/// Name of the session cookie issued by [`test_session_middleware`].
pub const TEST_SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(TEST_SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == TEST_SESSION_COOKIE)
        .map(Cookie::into_owned)
}

/// Wrap mocked driving ports in handler state.
#[cfg(test)]
pub(crate) fn http_state(
    login: crate::domain::ports::MockLoginService,
    patients: crate::domain::ports::MockPatientQuery,
    patients_command: crate::domain::ports::MockPatientCommand,
) -> actix_web::web::Data<super::state::HttpState> {
    use std::sync::Arc;

    actix_web::web::Data::new(super::state::HttpState::new(
        Arc::new(login),
        Arc::new(patients),
        Arc::new(patients_command),
    ))
}
