//! HTTP server construction.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use domain_intel_toolbox::IntelSource;

use crate::config::{AppConfig, CorsConfig};
use crate::routes;

/// Shared, read-only state handed to every worker.
pub struct AppState {
    source: Arc<dyn IntelSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn IntelSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &dyn IntelSource {
        self.source.as_ref()
    }
}

/// CORS middleware from config; `"*"` answers every origin with a wildcard.
pub fn build_cors(config: &CorsConfig) -> Cors {
    let cors = if config.allows_any_origin() {
        Cors::default().allow_any_origin().send_wildcard()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allow_any_method()
        .allow_any_header()
        .max_age(config.max_age_secs)
}

/// Bind and run until shutdown.
pub async fn run(config: AppConfig, source: Arc<dyn IntelSource>) -> anyhow::Result<()> {
    let state = web::Data::new(AppState::new(source));
    let cors_config = config.cors.clone();
    let workers = config.server.worker_count();
    let bind_addr = (config.server.host.clone(), config.server.port);

    tracing::info!(
        host = %bind_addr.0,
        port = bind_addr.1,
        workers,
        "starting HTTP server"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(build_cors(&cors_config))
            .wrap(Logger::default())
            .configure(routes::configure)
    })
    .workers(workers)
    .bind(bind_addr.clone())
    .with_context(|| format!("failed to bind {}:{}", bind_addr.0, bind_addr.1))?
    .run()
    .await
    .context("HTTP server error")
}
