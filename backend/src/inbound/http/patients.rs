//! Patient API handlers.
//!
//! ```text
//! GET   /api/patients?older=65
//! GET   /api/patients/{id}
//! POST  /api/patients
//! PATCH /api/patients/{id}
//! POST  /api/patients/{id}/health-records
//! ```
//!
//! Every route except health-record reporting requires a `PERSONNEL`
//! session. Patients may report checks for themselves only.

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, HealthRecord, LoginCredentials, NewPatient, Patient, PatientProfile, PatientUpdate,
    SymptomCheck, Symptoms, Temperature,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ID, health_record_validation_error, login_validation_error, parse_age_filter,
    parse_patient_id, patient_validation_error,
};

/// Query parameters accepted by `GET /api/patients`.
///
/// `older` is kept as text so malformed values surface as validation errors
/// with field details rather than a bare extractor failure.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientListQuery {
    /// Only return patients strictly older than this many years.
    #[param(value_type = Option<u32>, minimum = 0, example = 65)]
    pub older: Option<String>,
}

/// One symptom check as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecordResponse {
    #[schema(value_type = String, format = DateTime, example = "2020-04-01T12:00:00Z")]
    pub created_on: DateTime<Utc>,
    pub cough: bool,
    pub headache: bool,
    #[schema(example = 36.6)]
    pub temperature: f32,
    pub throat_ache: bool,
    pub diarrhea: bool,
    pub join_pain: bool,
    pub muscle_pain: bool,
    pub palpitations: bool,
    pub phlegm: bool,
    pub respiratory_distress: bool,
    pub smell_taste_loss: bool,
}

impl From<&HealthRecord> for HealthRecordResponse {
    fn from(record: &HealthRecord) -> Self {
        let symptoms = record.symptoms();
        Self {
            created_on: record.created_on(),
            cough: symptoms.cough,
            headache: symptoms.headache,
            temperature: record.temperature().celsius(),
            throat_ache: symptoms.throat_ache,
            diarrhea: symptoms.diarrhea,
            join_pain: symptoms.join_pain,
            muscle_pain: symptoms.muscle_pain,
            palpitations: symptoms.palpitations,
            phlegm: symptoms.phlegm,
            respiratory_distress: symptoms.respiratory_distress,
            smell_taste_loss: symptoms.smell_taste_loss,
        }
    }
}

/// Patient with nested health records, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "12345678A")]
    pub personal_id: String,
    #[schema(example = "Herminia")]
    pub name: String,
    #[schema(example = "600000000")]
    pub phone: String,
    #[schema(example = 78)]
    pub age: u32,
    pub health_records: Vec<HealthRecordResponse>,
}

impl From<&Patient> for PatientResponse {
    fn from(patient: &Patient) -> Self {
        let profile = patient.profile();
        Self {
            id: patient.id().get(),
            personal_id: profile.personal_id().to_owned(),
            name: profile.name().to_owned(),
            phone: profile.phone().to_owned(),
            age: profile.age().years(),
            health_records: patient
                .health_records()
                .iter()
                .map(HealthRecordResponse::from)
                .collect(),
        }
    }
}

/// Request body for `POST /api/patients`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterPatientRequest {
    pub personal_id: String,
    pub name: String,
    pub phone: String,
    pub age: u32,
    /// Login used by the patient to report symptom checks.
    pub username: String,
    pub password: String,
}

impl TryFrom<RegisterPatientRequest> for NewPatient {
    type Error = Error;

    fn try_from(value: RegisterPatientRequest) -> Result<Self, Self::Error> {
        let profile =
            PatientProfile::try_from_parts(&value.personal_id, &value.name, &value.phone, value.age)
                .map_err(patient_validation_error)?;
        let credentials = LoginCredentials::try_from_parts(&value.username, &value.password)
            .map_err(login_validation_error)?;
        Ok(Self {
            profile,
            credentials,
        })
    }
}

/// Request body for `PATCH /api/patients/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePatientRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

/// Request body for `POST /api/patients/{id}/health-records`.
///
/// Symptom flags default to `false` when omitted.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RecordHealthCheckRequest {
    #[schema(example = 37.2)]
    pub temperature: f32,
    #[serde(default)]
    pub cough: bool,
    #[serde(default)]
    pub headache: bool,
    #[serde(default)]
    pub throat_ache: bool,
    #[serde(default)]
    pub diarrhea: bool,
    #[serde(default)]
    pub join_pain: bool,
    #[serde(default)]
    pub muscle_pain: bool,
    #[serde(default)]
    pub palpitations: bool,
    #[serde(default)]
    pub phlegm: bool,
    #[serde(default)]
    pub respiratory_distress: bool,
    #[serde(default)]
    pub smell_taste_loss: bool,
}

impl TryFrom<RecordHealthCheckRequest> for SymptomCheck {
    type Error = Error;

    fn try_from(value: RecordHealthCheckRequest) -> Result<Self, Self::Error> {
        let temperature =
            Temperature::new(value.temperature).map_err(health_record_validation_error)?;
        Ok(Self {
            symptoms: Symptoms {
                cough: value.cough,
                headache: value.headache,
                throat_ache: value.throat_ache,
                diarrhea: value.diarrhea,
                join_pain: value.join_pain,
                muscle_pain: value.muscle_pain,
                palpitations: value.palpitations,
                phlegm: value.phlegm,
                respiratory_distress: value.respiratory_distress,
                smell_taste_loss: value.smell_taste_loss,
            },
            temperature,
        })
    }
}

/// List patients, optionally only those older than `older` years.
#[utoipa::path(
    get,
    path = "/api/patients",
    params(PatientListQuery),
    responses(
        (status = 200, description = "Patients with records most recent first", body = [PatientResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["patients"],
    operation_id = "listPatients"
)]
#[get("/patients")]
pub async fn list_patients(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PatientListQuery>,
) -> ApiResult<web::Json<Vec<PatientResponse>>> {
    session.require_personnel()?;
    let filter = parse_age_filter(query.older.as_deref())?;
    let patients = state.patients.list_patients(filter).await?;
    Ok(web::Json(patients.iter().map(PatientResponse::from).collect()))
}

/// Fetch one patient by id.
#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = i64, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Patient", body = PatientResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["patients"],
    operation_id = "getPatient"
)]
#[get("/patients/{id}")]
pub async fn get_patient(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PatientResponse>> {
    session.require_personnel()?;
    let id = parse_patient_id(&path, ID)?;
    let patient = state.patients.get_patient(id).await?;
    Ok(web::Json(PatientResponse::from(&patient)))
}

/// Register a patient and their login.
#[utoipa::path(
    post,
    path = "/api/patients",
    request_body = RegisterPatientRequest,
    responses(
        (status = 201, description = "Patient registered", body = PatientResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 409, description = "Personal id or username already registered", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["patients"],
    operation_id = "registerPatient"
)]
#[post("/patients")]
pub async fn register_patient(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterPatientRequest>,
) -> ApiResult<HttpResponse> {
    session.require_personnel()?;
    let new_patient = NewPatient::try_from(payload.into_inner())?;
    let patient = state.patients_command.register_patient(new_patient).await?;
    Ok(HttpResponse::Created().json(PatientResponse::from(&patient)))
}

/// Change a patient's name, phone, or age.
#[utoipa::path(
    patch,
    path = "/api/patients/{id}",
    params(("id" = i64, Path, description = "Patient identifier")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Updated patient", body = PatientResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["patients"],
    operation_id = "updatePatient"
)]
#[patch("/patients/{id}")]
pub async fn update_patient(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdatePatientRequest>,
) -> ApiResult<web::Json<PatientResponse>> {
    session.require_personnel()?;
    let id = parse_patient_id(&path, ID)?;
    let UpdatePatientRequest { name, phone, age } = payload.into_inner();
    let update = PatientUpdate::try_from_parts(name.as_deref(), phone.as_deref(), age)
        .map_err(patient_validation_error)?;
    let patient = state.patients_command.update_patient(id, update).await?;
    Ok(web::Json(PatientResponse::from(&patient)))
}

/// Record a symptom check for a patient.
///
/// Personnel may report for anyone; a patient only for themselves.
#[utoipa::path(
    post,
    path = "/api/patients/{id}/health-records",
    params(("id" = i64, Path, description = "Patient identifier")),
    request_body = RecordHealthCheckRequest,
    responses(
        (status = 201, description = "Health record created", body = HealthRecordResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["patients"],
    operation_id = "recordHealthCheck"
)]
#[post("/patients/{id}/health-records")]
pub async fn record_health_check(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecordHealthCheckRequest>,
) -> ApiResult<HttpResponse> {
    let principal = session.require_principal()?;
    let id = parse_patient_id(&path, ID)?;
    if !principal.can_report_for(id) {
        return Err(Error::forbidden(format!(
            "not allowed to report checks for patient {id}"
        )));
    }
    let check = SymptomCheck::try_from(payload.into_inner())?;
    let record = state.patients_command.record_health_check(id, check).await?;
    Ok(HttpResponse::Created().json(HealthRecordResponse::from(&record)))
}

#[cfg(test)]
#[path = "patients_tests.rs"]
mod tests;
