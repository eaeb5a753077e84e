//! Route handlers.

use actix_web::{HttpResponse, web};
use domain_intel_toolbox::{LookupReport, normalize_domain};
use serde::Serialize;
use tracing_attributes::instrument;
use uuid::Uuid;

use crate::error::ApiError;
use crate::request::LookupRequest;
use crate::server::AppState;

/// Register the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/lookup", web::post().to(lookup))
            .route("/health", web::get().to(health)),
    );
}

/// `POST /api/lookup`
///
/// The four lookups run one after another; their failures only degrade the
/// report, so a valid domain always gets a 200.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn lookup(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse, ApiError> {
    let request = LookupRequest::from_body(&body);
    let domain = normalize_domain(&request.domain);
    if domain.is_empty() {
        tracing::info!(raw = %request.domain, "rejected lookup: empty domain");
        return Err(ApiError::InvalidDomain);
    }

    tracing::info!(%domain, "lookup started");
    let report = LookupReport::collect(state.source(), &domain).await;
    tracing::info!(
        %domain,
        subdomains = report.subdomain_list().len(),
        geoip_ok = report.geoip.is_ok(),
        whois_ok = report.whois.is_ok(),
        "lookup finished"
    );

    Ok(HttpResponse::Ok().json(report))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
