//! Backend entry-point: loads settings, prepares storage, and serves the API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use patient_monitor::inbound::http::health::HealthState;
use patient_monitor::inbound::http::session_config::{
    BuildMode, SessionOptions, session_settings,
};
use patient_monitor::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use patient_monitor::outbound::security::Pbkdf2PasswordHasher;

use server::{AppSettings, ServerConfig, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let mode = BuildMode::from_debug_assertions();

    let session = session_settings(
        &SessionOptions {
            key_file: settings.session_key_file(),
            allow_ephemeral: settings.session_allow_ephemeral,
            cookie_secure: settings.cookie_secure(),
        },
        mode,
    )
    .map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let personnel = settings
        .personnel_credentials()
        .map_err(std::io::Error::other)?;
    let hasher = Pbkdf2PasswordHasher::with_iterations(settings.password_iterations())
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let mut config = ServerConfig::new(session, bind_addr);
    match settings.database_url.as_deref() {
        Some(database_url) => {
            if settings.run_migrations() {
                run_pending_migrations(database_url)
                    .await
                    .map_err(std::io::Error::other)?;
            }
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.pool_max_size()),
            )
            .await
            .map_err(std::io::Error::other)?;
            config = config.with_db_pool(pool);
        }
        None if mode == BuildMode::Release => {
            return Err(std::io::Error::other(
                "database_url must be set in release builds",
            ));
        }
        None => {}
    }

    let http_state = build_http_state(&config, hasher, personnel.as_ref())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting patient monitor");
    create_server(health_state, http_state, config)?.await
}
