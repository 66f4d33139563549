//! PostgreSQL-backed `PatientRepository` implementation using Diesel ORM.
//!
//! Patients are loaded first, then their health records in one
//! `belonging_to` query grouped back per patient. Records arrive ordered by
//! `created_on DESC, id ASC`; the domain constructor re-sorts them stably, so
//! the database order only decides ties.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{PatientRepository, PatientRepositoryError};
use crate::domain::{
    HealthRecord, Patient, PatientFilter, PatientId, PatientProfile, PatientRegistration,
    PatientUpdate, Role, SymptomCheck, Symptoms, Temperature,
};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, pool_error_message, unique_violation_message,
};
use super::models::{
    HealthRecordRow, NewCredentialRow, NewHealthRecordRow, NewPatientRow, PatientChangeset,
    PatientRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{credentials, health_records, patients};

/// Diesel-backed implementation of the patient repository port.
#[derive(Clone)]
pub struct DieselPatientRepository {
    pool: DbPool,
}

impl DieselPatientRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PatientRepositoryError {
    PatientRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> PatientRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => PatientRepositoryError::connection(message),
        DieselFailure::Query(message) => PatientRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint } => {
            PatientRepositoryError::conflict(unique_violation_message(constraint.as_deref()))
        }
        DieselFailure::ForeignKeyViolation { .. } => {
            PatientRepositoryError::query("foreign key violation")
        }
    }
}

/// Foreign key failures while inserting a record mean the owner is missing.
fn map_record_insert_error(error: diesel::result::Error, patient_id: i64) -> PatientRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::ForeignKeyViolation { .. } => {
            PatientRepositoryError::unknown_patient(patient_id)
        }
        DieselFailure::Connection(message) => PatientRepositoryError::connection(message),
        DieselFailure::Query(message) => PatientRepositoryError::query(message),
        DieselFailure::UniqueViolation { constraint } => {
            PatientRepositoryError::conflict(unique_violation_message(constraint.as_deref()))
        }
    }
}

fn age_to_db(years: u32) -> Result<i32, PatientRepositoryError> {
    i32::try_from(years).map_err(|_| PatientRepositoryError::query("age exceeds column range"))
}

fn row_to_record(row: HealthRecordRow) -> Result<HealthRecord, PatientRepositoryError> {
    let patient_id = PatientId::new(row.patient_id)
        .map_err(|err| PatientRepositoryError::query(err.to_string()))?;
    let temperature = Temperature::new(row.temperature)
        .map_err(|err| PatientRepositoryError::query(err.to_string()))?;
    let symptoms = Symptoms {
        cough: row.cough,
        headache: row.headache,
        throat_ache: row.throat_ache,
        diarrhea: row.diarrhea,
        join_pain: row.join_pain,
        muscle_pain: row.muscle_pain,
        palpitations: row.palpitations,
        phlegm: row.phlegm,
        respiratory_distress: row.respiratory_distress,
        smell_taste_loss: row.smell_taste_loss,
    };
    Ok(HealthRecord::new(
        patient_id,
        SymptomCheck {
            symptoms,
            temperature,
        },
        row.created_on,
    ))
}

fn row_to_patient(
    row: PatientRow,
    records: Vec<HealthRecordRow>,
) -> Result<Patient, PatientRepositoryError> {
    let PatientRow {
        id,
        personal_id,
        name,
        phone,
        age,
    } = row;
    let id = PatientId::new(id).map_err(|err| PatientRepositoryError::query(err.to_string()))?;
    let age = u32::try_from(age)
        .map_err(|_| PatientRepositoryError::query(format!("negative age stored for {id}")))?;
    let profile = PatientProfile::try_from_parts(&personal_id, &name, &phone, age)
        .map_err(|err| PatientRepositoryError::query(err.to_string()))?;
    let records = records
        .into_iter()
        .map(row_to_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Patient::new(id, profile, records))
}

fn record_to_row(record: &HealthRecord) -> NewHealthRecordRow {
    let symptoms = record.symptoms();
    NewHealthRecordRow {
        patient_id: record.patient_id().get(),
        created_on: record.created_on(),
        cough: symptoms.cough,
        headache: symptoms.headache,
        throat_ache: symptoms.throat_ache,
        diarrhea: symptoms.diarrhea,
        join_pain: symptoms.join_pain,
        muscle_pain: symptoms.muscle_pain,
        palpitations: symptoms.palpitations,
        phlegm: symptoms.phlegm,
        respiratory_distress: symptoms.respiratory_distress,
        smell_taste_loss: symptoms.smell_taste_loss,
        temperature: record.temperature().celsius(),
    }
}

/// Attach health records to already loaded patient rows.
async fn with_records(
    conn: &mut AsyncPgConnection,
    rows: Vec<PatientRow>,
) -> Result<Vec<Patient>, PatientRepositoryError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<HealthRecordRow> = HealthRecordRow::belonging_to(&rows)
        .select(HealthRecordRow::as_select())
        .order((health_records::created_on.desc(), health_records::id.asc()))
        .load(conn)
        .await
        .map_err(map_diesel_error)?;
    let grouped = records.grouped_by(&rows);

    rows.into_iter()
        .zip(grouped)
        .map(|(row, records)| row_to_patient(row, records))
        .collect()
}

#[async_trait]
impl PatientRepository for DieselPatientRepository {
    async fn list(&self, filter: &PatientFilter) -> Result<Vec<Patient>, PatientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = patients::table
            .select(PatientRow::as_select())
            .order(patients::id.asc())
            .into_boxed();
        if let Some(threshold) = filter.age_threshold() {
            // Thresholds beyond the column range match nobody.
            let Ok(threshold) = i32::try_from(threshold) else {
                return Ok(Vec::new());
            };
            query = query.filter(patients::age.gt(threshold));
        }
        let rows: Vec<PatientRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        with_records(&mut conn, rows).await
    }

    async fn find_by_id(&self, id: PatientId) -> Result<Option<Patient>, PatientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = patients::table
            .filter(patients::id.eq(id.get()))
            .select(PatientRow::as_select())
            .first::<PatientRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        Ok(with_records(&mut conn, vec![row]).await?.pop())
    }

    async fn create(
        &self,
        registration: &PatientRegistration,
    ) -> Result<Patient, PatientRepositoryError> {
        let profile = &registration.profile;
        let age = age_to_db(profile.age().years())?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_credential = NewCredentialRow {
            username: registration.username.as_str(),
            password_hash: registration.password_hash.as_str(),
            role: Role::Patient.as_str(),
        };
        let row = conn
            .transaction(|conn| {
                async move {
                    let credential_id: i64 = diesel::insert_into(credentials::table)
                        .values(&new_credential)
                        .returning(credentials::id)
                        .get_result(conn)
                        .await?;

                    diesel::insert_into(patients::table)
                        .values(&NewPatientRow {
                            personal_id: profile.personal_id(),
                            name: profile.name(),
                            phone: profile.phone(),
                            age,
                            credential_id,
                        })
                        .returning(PatientRow::as_returning())
                        .get_result::<PatientRow>(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_patient(row, Vec::new())
    }

    async fn update(
        &self,
        id: PatientId,
        update: &PatientUpdate,
    ) -> Result<Option<Patient>, PatientRepositoryError> {
        let age = update.age().map(|age| age_to_db(age.years())).transpose()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(patients::table.filter(patients::id.eq(id.get())))
            .set(&PatientChangeset {
                name: update.name(),
                phone: update.phone(),
                age,
                updated_at: Utc::now(),
            })
            .returning(PatientRow::as_returning())
            .get_result::<PatientRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        Ok(with_records(&mut conn, vec![row]).await?.pop())
    }

    async fn insert_health_record(
        &self,
        record: &HealthRecord,
    ) -> Result<(), PatientRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let patient_id = record.patient_id().get();

        diesel::insert_into(health_records::table)
            .values(&record_to_row(record))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_record_insert_error(err, patient_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn record_row(patient_id: i64, hour: u32, temperature: f32) -> HealthRecordRow {
        HealthRecordRow {
            id: i64::from(hour),
            patient_id,
            created_on: Utc
                .with_ymd_and_hms(2020, 4, 1, hour, 0, 0)
                .single()
                .expect("valid timestamp"),
            cough: true,
            headache: false,
            throat_ache: false,
            diarrhea: false,
            join_pain: false,
            muscle_pain: false,
            palpitations: false,
            phlegm: true,
            respiratory_distress: false,
            smell_taste_loss: false,
            temperature,
        }
    }

    fn patient_row(age: i32) -> PatientRow {
        PatientRow {
            id: 1,
            personal_id: "X1".to_owned(),
            name: "Herminia".to_owned(),
            phone: "600".to_owned(),
            age,
        }
    }

    #[rstest]
    fn rows_convert_to_patient_with_sorted_records() {
        let patient = row_to_patient(
            patient_row(20),
            vec![record_row(1, 9, 36.5), record_row(1, 11, 37.0), record_row(1, 10, 38.1)],
        )
        .expect("valid rows");

        let hours: Vec<u32> = patient
            .health_records()
            .iter()
            .map(|record| chrono::Timelike::hour(&record.created_on()))
            .collect();
        assert_eq!(hours, vec![11, 10, 9]);
        assert!(patient.health_records()[0].symptoms().phlegm);
    }

    #[rstest]
    fn negative_age_is_a_query_error() {
        let err = row_to_patient(patient_row(-1), Vec::new()).expect_err("invalid age");
        assert!(matches!(err, PatientRepositoryError::Query { .. }));
    }

    #[rstest]
    fn out_of_range_temperature_is_a_query_error() {
        let err = row_to_record(record_row(1, 9, 80.0)).expect_err("invalid temperature");
        assert!(matches!(err, PatientRepositoryError::Query { .. }));
    }

    #[rstest]
    fn record_round_trips_into_insert_row() {
        let record = row_to_record(record_row(4, 9, 36.6)).expect("valid row");
        let row = record_to_row(&record);
        assert_eq!(row.patient_id, 4);
        assert!(row.cough);
        assert!((row.temperature - 36.6).abs() < f32::EPSILON);
    }
}
