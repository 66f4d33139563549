//! Shared Diesel error classification for the repositories.
//!
//! Repositories translate a [`DieselFailure`] into their own port error so the
//! classification rules (which database error kinds mean "connection lost",
//! "duplicate", or "missing parent") live in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Database failure reduced to the categories repositories care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection was closed underneath the query.
    Connection(&'static str),
    /// Any other query failure.
    Query(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
}

/// Extract the message carried by a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging the database detail at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ForeignKeyViolation => DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ClosedConnection => {
                DieselFailure::Connection("database connection error")
            }
            _ => DieselFailure::Query("database error"),
        },
        _ => DieselFailure::Query("database error"),
    }
}

/// Human-readable conflict message for a unique constraint name.
pub(crate) fn unique_violation_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("username") => "username already registered",
        Some(name) if name.contains("personal_id") => "personal id already registered",
        _ => "record already exists",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct StubInfo {
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            "stub"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StubInfo { constraint }))
    }

    #[rstest]
    fn closed_connection_is_a_connection_failure() {
        let failure = classify_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert_eq!(failure, DieselFailure::Connection("database connection error"));
    }

    #[rstest]
    fn unique_violation_keeps_constraint_name() {
        let failure = classify_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("credentials_username_key"),
        ));
        assert_eq!(
            failure,
            DieselFailure::UniqueViolation {
                constraint: Some("credentials_username_key".to_owned())
            }
        );
    }

    #[rstest]
    fn foreign_key_violation_is_classified() {
        let failure = classify_diesel_error(database_error(
            DatabaseErrorKind::ForeignKeyViolation,
            Some("health_records_patient_id_fkey"),
        ));
        assert!(matches!(failure, DieselFailure::ForeignKeyViolation { .. }));
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            classify_diesel_error(DieselError::NotFound),
            DieselFailure::Query("record not found")
        );
    }

    #[rstest]
    #[case(Some("credentials_username_key"), "username already registered")]
    #[case(Some("patients_personal_id_key"), "personal id already registered")]
    #[case(None, "record already exists")]
    fn unique_violation_messages(#[case] constraint: Option<&str>, #[case] expected: &str) {
        assert_eq!(unique_violation_message(constraint), expected);
    }

    #[rstest]
    fn pool_error_message_unwraps_both_variants() {
        assert_eq!(pool_error_message(PoolError::checkout("timeout")), "timeout");
        assert_eq!(pool_error_message(PoolError::build("bad url")), "bad url");
    }
}
