//! End-to-end tests for the lookup API against a canned lookup source.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use actix_web::{App, http::StatusCode, test, web};
use async_trait::async_trait;
use domain_intel_toolbox::{
    DnsRecordType, DnsReport, GeoIpData, IntelSource, ToolboxError, ToolboxResult,
};
use domain_intel_web::config::CorsConfig;
use domain_intel_web::server::build_cors;
use domain_intel_web::{AppState, routes};
use serde_json::{Value, json};

/// Answers like a live domain unless the name ends in `.invalid`.
#[derive(Default)]
struct CannedSource {
    seen: Mutex<Vec<String>>,
}

impl CannedSource {
    fn unreachable(domain: &str) -> bool {
        domain.ends_with(".invalid")
    }
}

#[async_trait]
impl IntelSource for CannedSource {
    async fn dns_records(&self, domain: &str) -> DnsReport {
        self.seen.lock().unwrap().push(domain.to_string());
        let mut report = DnsReport::new();
        for record_type in DnsRecordType::ALL {
            let outcome = match (Self::unreachable(domain), record_type) {
                (true, _) => Err(ToolboxError::NotFound(format!("{record_type} {domain}"))),
                (false, DnsRecordType::A) => Ok(vec!["93.184.216.34".to_string()]),
                (false, DnsRecordType::Ns) => Ok(vec![
                    "a.iana-servers.net.".to_string(),
                    "b.iana-servers.net.".to_string(),
                ]),
                (false, _) => Err(ToolboxError::NotFound(format!("{record_type} {domain}"))),
            };
            report.insert(record_type, outcome);
        }
        report
    }

    async fn subdomains(&self, domain: &str) -> ToolboxResult<Vec<String>> {
        if Self::unreachable(domain) {
            return Err(ToolboxError::UpstreamStatus {
                service: "crt.sh".to_string(),
                status: 502,
            });
        }
        Ok(vec![format!("www.{domain}"), format!("mail.{domain}")])
    }

    async fn geoip(&self, domain: &str) -> ToolboxResult<GeoIpData> {
        if Self::unreachable(domain) {
            return Err(ToolboxError::ResolveError(format!("No IPv4 address for {domain}")));
        }
        let value = json!({
            "status": "success",
            "country": "United States",
            "query": "93.184.216.34"
        });
        Ok(value.as_object().unwrap().clone())
    }

    async fn whois(&self, domain: &str) -> ToolboxResult<String> {
        if Self::unreachable(domain) {
            return Err(ToolboxError::NotFound(domain.to_string()));
        }
        Ok("{\n  \"domain_name\": \"EXAMPLE.COM\"\n}".to_string())
    }
}

macro_rules! init_app {
    ($source:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new($source)))
                .wrap(build_cors(&CorsConfig::default()))
                .configure(routes::configure),
        )
        .await
    };
}

async fn post_lookup(body: Value) -> (StatusCode, Value) {
    let app = init_app!(Arc::new(CannedSource::default()));
    let req = test::TestRequest::post()
        .uri("/api/lookup")
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let json: Value = test::read_body_json(resp).await;
    (status, json)
}

#[actix_web::test]
async fn test_lookup_returns_all_sections() {
    let (status, json) = post_lookup(json!({"domain": "example.com"})).await;
    assert_eq!(status, StatusCode::OK);

    let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, ["dns", "domain", "geoip", "subdomains", "whois"]);
    assert_eq!(json["domain"], "example.com");

    let dns = json["dns"].as_object().unwrap();
    assert_eq!(dns.len(), 5);
    assert_eq!(dns["A"], json!(["93.184.216.34"]));
    assert_eq!(dns["MX"], json!([]));
    assert_eq!(json["subdomains"], json!(["www.example.com", "mail.example.com"]));
    assert_eq!(json["geoip"]["status"], "success");
    assert!(json["whois"].is_string());
}

#[actix_web::test]
async fn test_lookup_normalizes_url_input() {
    let (status, json) = post_lookup(json!({"domain": "https://example.com/path?q=1"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["domain"], "example.com");
}

#[actix_web::test]
async fn test_lookup_passes_normalized_domain_to_source() {
    let source = Arc::new(CannedSource::default());
    let app = init_app!(source.clone());
    let req = test::TestRequest::post()
        .uri("/api/lookup")
        .set_json(json!({"domain": "http://example.org/index.html"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(*source.seen.lock().unwrap(), vec!["example.org".to_string()]);
}

#[actix_web::test]
async fn test_lookup_empty_domain_is_rejected() {
    for body in [
        json!({"domain": ""}),
        json!({"domain": "https://"}),
        json!({"domain": "http:///path"}),
        json!({}),
        json!({"domain": 42}),
    ] {
        let (status, json) = post_lookup(body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(json, json!({"error": "Domain tidak valid"}), "body {body}");
    }
}

#[actix_web::test]
async fn test_lookup_non_json_body_is_rejected() {
    let app = init_app!(Arc::new(CannedSource::default()));
    let req = test::TestRequest::post()
        .uri("/api/lookup")
        .insert_header(("content-type", "text/plain"))
        .set_payload("example.com")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json: Value = test::read_body_json(resp).await;
    assert_eq!(json, json!({"error": "Domain tidak valid"}));
}

#[actix_web::test]
async fn test_lookup_unreachable_domain_degrades() {
    let (status, json) = post_lookup(json!({"domain": "nothing-here.invalid"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["domain"], "nothing-here.invalid");
    assert_eq!(
        json["dns"],
        json!({"A": [], "MX": [], "NS": [], "TXT": [], "CNAME": []})
    );
    assert_eq!(json["subdomains"], json!([]));
    assert_eq!(json["geoip"], json!({"error": "Gagal mengambil data GeoIP"}));
    assert_eq!(json["whois"], "Data Whois diproteksi atau tidak ditemukan.");
}

#[actix_web::test]
async fn test_lookup_get_not_allowed() {
    let app = init_app!(Arc::new(CannedSource::default()));
    let req = test::TestRequest::get().uri("/api/lookup").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_cors_allows_any_origin() {
    let app = init_app!(Arc::new(CannedSource::default()));
    let req = test::TestRequest::post()
        .uri("/api/lookup")
        .insert_header(("origin", "https://someone.github.io"))
        .set_json(json!({"domain": "example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .unwrap()
            .to_str()
            .unwrap(),
        "*"
    );
}

#[actix_web::test]
async fn test_health() {
    let app = init_app!(Arc::new(CannedSource::default()));
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let json: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}
