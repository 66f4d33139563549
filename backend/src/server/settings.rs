//! Server settings loaded via OrthoConfig.
//!
//! Values merge CLI flags, `PATIENT_MONITOR_*` environment variables, and an
//! optional configuration file. Unset options fall back to the defaults
//! exposed by the accessor methods.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use patient_monitor::domain::{LoginCredentials, LoginValidationError};
use patient_monitor::outbound::security::DEFAULT_ITERATIONS;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Only one of the personnel username and password was provided.
    #[error("personnel_username and personnel_password must be set together")]
    IncompletePersonnel,
    /// The personnel credentials are malformed.
    #[error("invalid personnel credentials: {0}")]
    InvalidPersonnel(#[from] LoginValidationError),
}

/// Configuration values controlling the HTTP server and its adapters.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PATIENT_MONITOR")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. Without it the server uses memory
    /// storage, which only debug builds allow.
    pub database_url: Option<String>,
    /// Largest number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Apply embedded migrations at startup.
    pub run_migrations: Option<bool>,
    /// File holding the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Allow a random session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: Option<bool>,
    /// PBKDF2 rounds used for new password hashes.
    pub password_iterations: Option<u32>,
    /// Username of the personnel account provisioned at startup.
    pub personnel_username: Option<String>,
    /// Password of the personnel account provisioned at startup.
    pub personnel_password: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("pool_max_size", &self.pool_max_size)
            .field("run_migrations", &self.run_migrations)
            .field("session_key_file", &self.session_key_file)
            .field("session_allow_ephemeral", &self.session_allow_ephemeral)
            .field("cookie_secure", &self.cookie_secure)
            .field("password_iterations", &self.password_iterations)
            .field("personnel_username", &self.personnel_username)
            .field(
                "personnel_password",
                &self.personnel_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl AppSettings {
    /// Parsed bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Maximum pool size.
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether migrations run at startup; on by default.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    /// Session key file path.
    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether the session cookie is `Secure`; on by default.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// PBKDF2 iteration count.
    pub fn password_iterations(&self) -> u32 {
        self.password_iterations.unwrap_or(DEFAULT_ITERATIONS)
    }

    /// Bootstrap personnel credentials, when configured.
    pub fn personnel_credentials(&self) -> Result<Option<LoginCredentials>, SettingsError> {
        match (&self.personnel_username, &self.personnel_password) {
            (None, None) => Ok(None),
            (Some(username), Some(password)) => {
                Ok(Some(LoginCredentials::try_from_parts(username, password)?))
            }
            _ => Err(SettingsError::IncompletePersonnel),
        }
    }
}
