//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! small helpers for logging in, registering patients, and seeding health
//! records live here instead of being copied into every file.

#![allow(dead_code, reason = "each test crate uses a different subset")]

pub mod cluster_skip;
pub mod embedded_postgres;
pub mod pg_embed;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_template_database;
pub use pg_embed::shared_cluster;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::test;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};

use patient_monitor::domain::ports::PatientRepository;
use patient_monitor::domain::{HealthRecord, PatientId, SymptomCheck, Symptoms, Temperature};
use patient_monitor::inbound::http::test_utils::session_cookie;
use patient_monitor::test_support::InMemoryBackend;

pub const PERSONNEL_USERNAME: &str = "nurse";
pub const PERSONNEL_PASSWORD: &str = "correct horse";
pub const PATIENT_PASSWORD: &str = "patient-pass";

/// Backend with the default personnel account provisioned.
pub async fn backend_with_personnel() -> InMemoryBackend {
    let backend = InMemoryBackend::new().expect("backend wiring");
    backend
        .add_personnel(PERSONNEL_USERNAME, PERSONNEL_PASSWORD)
        .await
        .expect("personnel provisioned");
    backend
}

/// Log in and return the issued session cookie.
pub async fn login<S, B>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login as {username}");
    session_cookie(&response).expect("session cookie")
}

/// Log in with the personnel account.
pub async fn login_personnel<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    login(app, PERSONNEL_USERNAME, PERSONNEL_PASSWORD).await
}

/// Register a patient whose login is `username` and return the new id.
pub async fn register_patient<S, B>(
    app: &S,
    cookie: &Cookie<'static>,
    username: &str,
    age: u32,
) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/patients")
            .cookie(cookie.clone())
            .set_json(json!({
                "personalId": format!("pid-{username}"),
                "name": format!("Patient {username}"),
                "phone": "555-0100",
                "age": age,
                "username": username,
                "password": PATIENT_PASSWORD,
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "register {username}");
    let body: Value = test::read_body_json(response).await;
    body["id"].as_i64().expect("patient id")
}

/// Store a health record for `patient_id` taken `hours_ago` before `now`.
pub async fn seed_record(
    backend: &InMemoryBackend,
    patient_id: i64,
    now: DateTime<Utc>,
    hours_ago: i64,
    temperature: f32,
) {
    let check = SymptomCheck {
        symptoms: Symptoms {
            cough: hours_ago % 2 == 0,
            ..Symptoms::default()
        },
        temperature: Temperature::new(temperature).expect("valid temperature"),
    };
    let record = HealthRecord::new(
        PatientId::new(patient_id).expect("valid id"),
        check,
        now - Duration::hours(hours_ago),
    );
    backend
        .store
        .insert_health_record(&record)
        .await
        .expect("record stored");
}

/// Send an authenticated GET and return the status and JSON body.
pub async fn get_json<S, B>(app: &S, cookie: &Cookie<'static>, uri: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

/// `createdOn` values of a serialized patient, in response order.
pub fn record_timestamps(patient: &Value) -> Vec<DateTime<Utc>> {
    patient["healthRecords"]
        .as_array()
        .expect("health records array")
        .iter()
        .map(|record| {
            record["createdOn"]
                .as_str()
                .expect("createdOn string")
                .parse()
                .expect("RFC 3339 timestamp")
        })
        .collect()
}
