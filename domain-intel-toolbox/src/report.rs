//! The aggregate lookup report and the source trait it is collected from.

use async_trait::async_trait;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use crate::error::ToolboxResult;
use crate::types::{DnsReport, GeoIpData};

/// GeoIP fallback message ("failed to fetch GeoIP data").
pub const GEOIP_ERROR_MESSAGE: &str = "Gagal mengambil data GeoIP";

/// WHOIS fallback message ("WHOIS data is protected or not found").
pub const WHOIS_FALLBACK_MESSAGE: &str = "Data Whois diproteksi atau tidak ditemukan.";

/// The four independent lookups behind a report.
///
/// [`DomainIntelService`](crate::DomainIntelService) talks to the real upstreams;
/// tests plug in canned implementations.
#[async_trait]
pub trait IntelSource: Send + Sync {
    /// A, MX, NS, TXT and CNAME records.
    async fn dns_records(&self, domain: &str) -> DnsReport;

    /// Subdomains seen in certificate-transparency logs.
    async fn subdomains(&self, domain: &str) -> ToolboxResult<Vec<String>>;

    /// Geolocation of the domain's address.
    async fn geoip(&self, domain: &str) -> ToolboxResult<GeoIpData>;

    /// Formatted WHOIS registration data.
    async fn whois(&self, domain: &str) -> ToolboxResult<String>;
}

/// Combined result of all lookups for one domain.
///
/// Each part keeps its own outcome. Serialization produces the public JSON
/// shape, where failures turn into `[]`, the GeoIP error object or the WHOIS
/// fallback string.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupReport {
    pub domain: String,
    pub dns: DnsReport,
    pub subdomains: ToolboxResult<Vec<String>>,
    pub geoip: ToolboxResult<GeoIpData>,
    pub whois: ToolboxResult<String>,
}

impl LookupReport {
    /// Run every lookup against `source`, one after another.
    pub async fn collect<S: IntelSource + ?Sized>(source: &S, domain: &str) -> Self {
        let dns = source.dns_records(domain).await;
        for (record_type, err) in dns.failures() {
            log::debug!("[dns] {domain} {record_type}: {err}");
        }

        let subdomains = source.subdomains(domain).await;
        if let Err(e) = &subdomains {
            log::warn!("[crt.sh] {domain}: {e}");
        }

        let geoip = source.geoip(domain).await;
        if let Err(e) = &geoip {
            log::warn!("[geoip] {domain}: {e}");
        }

        let whois = source.whois(domain).await;
        if let Err(e) = &whois {
            log::warn!("[whois] {domain}: {e}");
        }

        Self {
            domain: domain.to_string(),
            dns,
            subdomains,
            geoip,
            whois,
        }
    }

    /// Subdomains, or an empty slice when the lookup failed.
    pub fn subdomain_list(&self) -> &[String] {
        self.subdomains.as_deref().unwrap_or_default()
    }

    /// Upstream GeoIP object, or `{"error": GEOIP_ERROR_MESSAGE}`.
    pub fn geoip_value(&self) -> Value {
        match &self.geoip {
            Ok(data) => Value::Object(data.clone()),
            Err(_) => json!({ "error": GEOIP_ERROR_MESSAGE }),
        }
    }

    /// WHOIS text, or [`WHOIS_FALLBACK_MESSAGE`].
    pub fn whois_text(&self) -> &str {
        self.whois.as_deref().unwrap_or(WHOIS_FALLBACK_MESSAGE)
    }
}

impl Serialize for LookupReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LookupReport", 5)?;
        state.serialize_field("domain", &self.domain)?;
        state.serialize_field("dns", &self.dns)?;
        state.serialize_field("subdomains", self.subdomain_list())?;
        state.serialize_field("geoip", &self.geoip_value())?;
        state.serialize_field("whois", self.whois_text())?;
        state.end()
    }
}
