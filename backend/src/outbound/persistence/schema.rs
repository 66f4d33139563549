//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` against a migrated database when the SQL changes.

diesel::table! {
    /// Login credentials for personnel and patients.
    credentials (id) {
        id -> Int8,
        /// Unique login name (max 64 characters).
        username -> Varchar,
        /// Encoded PBKDF2 hash.
        password_hash -> Text,
        /// `PERSONNEL` or `PATIENT`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Patients in isolation monitoring.
    patients (id) {
        id -> Int8,
        /// Unique national or hospital identifier.
        personal_id -> Varchar,
        name -> Varchar,
        phone -> Varchar,
        age -> Int4,
        /// Patient-role credential owned by this patient.
        credential_id -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Symptom checks; rows are never updated.
    health_records (id) {
        id -> Int8,
        patient_id -> Int8,
        created_on -> Timestamptz,
        cough -> Bool,
        headache -> Bool,
        throat_ache -> Bool,
        diarrhea -> Bool,
        join_pain -> Bool,
        muscle_pain -> Bool,
        palpitations -> Bool,
        phlegm -> Bool,
        respiratory_distress -> Bool,
        smell_taste_loss -> Bool,
        temperature -> Float4,
    }
}

diesel::joinable!(health_records -> patients (patient_id));
diesel::joinable!(patients -> credentials (credential_id));

diesel::allow_tables_to_appear_in_same_query!(credentials, health_records, patients);
