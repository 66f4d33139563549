//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it; repositories convert them into validated domain values.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{credentials, health_records, patients};

/// Row read from the `credentials` table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = credentials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialRow {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Insertable credential.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = credentials)]
pub(crate) struct NewCredentialRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Row read from the `patients` table.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = patients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PatientRow {
    pub id: i64,
    pub personal_id: String,
    pub name: String,
    pub phone: String,
    pub age: i32,
}

/// Insertable patient.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = patients)]
pub(crate) struct NewPatientRow<'a> {
    pub personal_id: &'a str,
    pub name: &'a str,
    pub phone: &'a str,
    pub age: i32,
    pub credential_id: i64,
}

/// Partial patient update; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = patients)]
pub(crate) struct PatientChangeset<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub age: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

/// Row read from the `health_records` table.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = health_records)]
#[diesel(belongs_to(PatientRow, foreign_key = patient_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HealthRecordRow {
    pub id: i64,
    pub patient_id: i64,
    pub created_on: DateTime<Utc>,
    pub cough: bool,
    pub headache: bool,
    pub throat_ache: bool,
    pub diarrhea: bool,
    pub join_pain: bool,
    pub muscle_pain: bool,
    pub palpitations: bool,
    pub phlegm: bool,
    pub respiratory_distress: bool,
    pub smell_taste_loss: bool,
    pub temperature: f32,
}

/// Insertable health record.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = health_records)]
pub(crate) struct NewHealthRecordRow {
    pub patient_id: i64,
    pub created_on: DateTime<Utc>,
    pub cough: bool,
    pub headache: bool,
    pub throat_ache: bool,
    pub diarrhea: bool,
    pub join_pain: bool,
    pub muscle_pain: bool,
    pub palpitations: bool,
    pub phlegm: bool,
    pub respiratory_distress: bool,
    pub smell_taste_loss: bool,
    pub temperature: f32,
}
