//! Registration, updates, health checks, and session lifecycle end to end.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use chrono::Utc;
use serde_json::{Value, json};

use support::{
    PATIENT_PASSWORD, backend_with_personnel, get_json, login, login_personnel,
    record_timestamps, register_patient,
};

#[actix_rt::test]
async fn duplicate_personal_id_conflicts() {
    let backend = backend_with_personnel().await;
    let app = test::init_service(backend.app()).await;
    let cookie = login_personnel(&app).await;
    register_patient(&app, &cookie, "herminia", 20).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/patients")
            .cookie(cookie.clone())
            .set_json(json!({
                "personalId": "pid-herminia",
                "name": "Someone Else",
                "phone": "555-0199",
                "age": 41,
                "username": "someone",
                "password": "pw",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "conflict");
}

#[actix_rt::test]
async fn update_changes_profile_and_keeps_records() {
    let backend = backend_with_personnel().await;
    let app = test::init_service(backend.app()).await;
    let cookie = login_personnel(&app).await;
    let id = register_patient(&app, &cookie, "herminia", 20).await;
    support::seed_record(&backend, id, Utc::now(), 1, 36.9).await;

    let response = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/patients/{id}"))
            .cookie(cookie.clone())
            .set_json(json!({ "phone": "555-0142", "age": 21 }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let (_, patient) = get_json(&app, &cookie, &format!("/api/patients/{id}")).await;
    assert_eq!(patient["phone"], "555-0142");
    assert_eq!(patient["age"], 21);
    assert_eq!(patient["name"], "Patient herminia");
    assert_eq!(record_timestamps(&patient).len(), 1);
}

#[actix_rt::test]
async fn patient_reports_own_health_check() {
    let backend = backend_with_personnel().await;
    let app = test::init_service(backend.app()).await;
    let personnel = login_personnel(&app).await;
    let id = register_patient(&app, &personnel, "herminia", 20).await;
    let other = register_patient(&app, &personnel, "ignacio", 52).await;
    let patient = login(&app, "herminia", PATIENT_PASSWORD).await;
    let check = json!({ "temperature": 38.4, "cough": true, "smellTasteLoss": true });

    let own = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/patients/{id}/health-records"))
            .cookie(patient.clone())
            .set_json(&check)
            .to_request(),
    )
    .await;
    let foreign = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/patients/{other}/health-records"))
            .cookie(patient.clone())
            .set_json(&check)
            .to_request(),
    )
    .await;

    assert_eq!(own.status(), StatusCode::CREATED);
    assert_eq!(foreign.status(), StatusCode::FORBIDDEN);
    let (_, stored) = get_json(&app, &personnel, &format!("/api/patients/{id}")).await;
    let records = stored["healthRecords"].as_array().expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["cough"], true);
    assert_eq!(records[0]["smellTasteLoss"], true);
    assert_eq!(records[0]["headache"], false);
    let (_, untouched) = get_json(&app, &personnel, &format!("/api/patients/{other}")).await;
    assert_eq!(record_timestamps(&untouched).len(), 0);
}

#[actix_rt::test]
async fn newest_reported_check_is_listed_first() {
    let backend = backend_with_personnel().await;
    let app = test::init_service(backend.app()).await;
    let personnel = login_personnel(&app).await;
    let id = register_patient(&app, &personnel, "herminia", 20).await;
    support::seed_record(&backend, id, Utc::now(), 5, 36.5).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/patients/{id}/health-records"))
            .cookie(personnel.clone())
            .set_json(json!({ "temperature": 39.0 }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let (_, patient) = get_json(&app, &personnel, &format!("/api/patients/{id}")).await;
    let records = patient["healthRecords"].as_array().expect("records");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["temperature"], 39.0);
}

#[actix_rt::test]
async fn health_check_for_unknown_patient_is_not_found() {
    let backend = backend_with_personnel().await;
    let app = test::init_service(backend.app()).await;
    let personnel = login_personnel(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/patients/404/health-records")
            .cookie(personnel)
            .set_json(json!({ "temperature": 37.0 }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn wrong_password_is_unauthorised() {
    let backend = backend_with_personnel().await;
    let app = test::init_service(backend.app()).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "username": support::PERSONNEL_USERNAME, "password": "nope" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
}

#[actix_rt::test]
async fn logout_ends_the_session() {
    let backend = backend_with_personnel().await;
    let app = test::init_service(backend.app()).await;
    let cookie = login_personnel(&app).await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cleared = patient_monitor::inbound::http::test_utils::session_cookie(&response)
        .expect("removal cookie");

    let after = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/patients")
            .cookie(cleared)
            .to_request(),
    )
    .await;

    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}
