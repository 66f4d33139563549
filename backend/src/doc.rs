//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP handler, the request/response DTOs, the
//! domain error wrappers from [`crate::inbound::http::schemas`], and the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! the `openapi-dump` binary prints it for external tooling.

use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::patients::{
    HealthRecordResponse, PatientResponse, RecordHealthCheckRequest, RegisterPatientRequest,
    UpdatePatientRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Patient monitor API",
        description = "Health records of patients in home isolation, for medical personnel."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::patients::list_patients,
        crate::inbound::http::patients::get_patient,
        crate::inbound::http::patients::register_patient,
        crate::inbound::http::patients::update_patient,
        crate::inbound::http::patients::record_health_check,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        PatientResponse,
        HealthRecordResponse,
        RegisterPatientRequest,
        UpdatePatientRequest,
        RecordHealthCheckRequest
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "patients", description = "Patients and their health records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[rstest]
    fn patient_schema_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let patient = schemas.get("PatientResponse").expect("PatientResponse schema");

        assert_object_schema_has_field(patient, "personalId");
        assert_object_schema_has_field(patient, "healthRecords");
    }

    #[rstest]
    #[case("/api/patients")]
    #[case("/api/patients/{id}")]
    #[case("/api/patients/{id}/health-records")]
    #[case("/api/login")]
    #[case("/health/ready")]
    fn documents_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn registers_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
