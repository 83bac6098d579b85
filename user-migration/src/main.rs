//! User Migration Main Entry Point
//!
//! Copies the legacy WordPress accounts, with their persona and label groups,
//! into the user API database. Re-running it updates what an earlier run
//! wrote instead of duplicating it.

use std::env;

use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use user_migration::{Dependencies, MigrationError, MigrationSettings, SshTunnel};
use user_migration_pipeline::RunReport;

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("user_migration=info,user_migration_pipeline=info"));

    let json = env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .init();
    }

    info!(
        service_name = "user-migration",
        service_version = env!("CARGO_PKG_VERSION"),
        json,
        "Tracing initialized"
    );
}

async fn migrate(settings: &MigrationSettings) -> Result<RunReport, MigrationError> {
    let deps = Dependencies::new(settings).await?;
    info!("Dependencies initialized successfully");

    Ok(deps.orchestrator.run().await?)
}

#[tokio::main]
async fn main() -> Result<(), MigrationError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    info!("Starting user migration");

    let settings = match MigrationSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e);
        }
    };

    let mut tunnel = match &settings.tunnel {
        Some(tunnel_settings) => match SshTunnel::start(tunnel_settings).await {
            Ok(tunnel) => Some(tunnel),
            Err(e) => {
                error!(error = %e, "Failed to open SSH tunnel");
                return Err(e.into());
            }
        },
        None => None,
    };

    let result = migrate(&settings).await;

    if let Some(tunnel) = tunnel.as_mut() {
        tunnel.stop().await;
    }

    match result {
        Ok(report) => {
            println!("{report}");
            info!("User migration completed successfully");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "User migration failed");
            Err(e)
        }
    }
}
