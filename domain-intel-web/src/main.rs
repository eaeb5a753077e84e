//! Domain Intel HTTP server entry point.
//!
//! Usage: `domain-intel-web [CONFIG_PATH]`

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use domain_intel_toolbox::DomainIntelService;
use domain_intel_web::{AppConfig, logging, server};

#[actix_web::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("domain-intel-web: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config_path = AppConfig::resolve_path(std::env::args().nth(1));
    let mut config = AppConfig::load(config_path.as_deref())?;
    config.apply_env_overrides()?;

    // Keep the file writer alive until shutdown
    let _guard = logging::init(&config.log)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?config_path,
        "starting domain-intel-web"
    );

    let service = DomainIntelService::new(config.lookup.clone())
        .context("failed to initialize lookup service")?;
    if config.lookup.geoip_timeout_secs.is_none() {
        tracing::warn!("GeoIP requests have no timeout; a stalled upstream blocks the request");
    }

    server::run(config, Arc::new(service)).await
}
