//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types; row structs (`models.rs`) and the schema (`schema.rs`) never leave
//! this module. Connections come from a `bb8` pool through `diesel-async`, and
//! every database error is mapped onto the port's error type.
//!
//! # Example
//!
//! ```no_run
//! use patient_monitor::outbound::persistence::{DbPool, DieselPatientRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/patients")).await?;
//! let repo = DieselPatientRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_credential_repository;
mod diesel_patient_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_credential_repository::DieselCredentialRepository;
pub use diesel_patient_repository::DieselPatientRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
