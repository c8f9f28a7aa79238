//! HR/payroll API server.
//!
//! Configuration is read from `HRMS_CONFIG_DIR` (default `./config/hrms`).
//! `HRMS_SESSION_SECRET` and `HRMS_BIND` override the file values, and
//! `RUST_LOG` overrides the configured log filter.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hr_payroll::api::{AppState, create_router};
use hr_payroll::auth::hash_password;
use hr_payroll::config::{ConfigLoader, ServerConfig};
use hr_payroll::store::Store;

const DEFAULT_CONFIG_DIR: &str = "./config/hrms";

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let _ = if server.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

fn load_config() -> anyhow::Result<ConfigLoader> {
    let dir = std::env::var("HRMS_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let mut config =
        ConfigLoader::load(&dir).with_context(|| format!("loading configuration from {}", dir))?;

    let app = config.config_mut().app_mut();
    if let Ok(secret) = std::env::var("HRMS_SESSION_SECRET") {
        app.session.secret = secret;
    }
    if let Ok(bind) = std::env::var("HRMS_BIND") {
        app.server.bind = bind;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.app().server);

    if std::env::var("HRMS_SESSION_SECRET").is_err() {
        warn!("HRMS_SESSION_SECRET not set; using the configured development secret");
    }

    let store = match &config.app().server.snapshot_path {
        Some(path) => {
            Store::open(path).with_context(|| format!("opening snapshot {}", path))?
        }
        None => {
            warn!("No snapshot_path configured; records are kept in memory only");
            Store::in_memory()
        }
    };

    if let Some(admin) = &config.app().bootstrap_admin {
        if store.seed_admin(&admin.email, &hash_password(&admin.password)?)? {
            warn!(email = %admin.email, "Created bootstrap admin; change its password");
        }
    }

    let bind = config.app().server.bind.clone();
    let app = create_router(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {}", bind))?;
    info!(address = %listener.local_addr()?, "HR/payroll API listening");

    axum::serve(listener, app).await?;
    Ok(())
}
