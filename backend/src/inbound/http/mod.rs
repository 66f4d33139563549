//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod patients;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register extractor configuration and every `/api` route on `cfg`.
///
/// Callers mount this under a scope wrapped in the session middleware:
///
/// ```
/// use actix_web::{App, web};
/// use patient_monitor::inbound::http;
///
/// let app = App::new().service(web::scope("/api").configure(http::configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(auth::login)
        .service(auth::logout)
        .service(patients::list_patients)
        .service(patients::register_patient)
        .service(patients::get_patient)
        .service(patients::update_patient)
        .service(patients::record_health_check);
}
