//! Service façade wiring the upstream lookups together.

mod dns;
mod ip;
mod resolver;
mod subdomains;
mod whois;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use whois_rust::WhoIs;

use crate::config::LookupConfig;
use crate::error::{ToolboxError, ToolboxResult};
use crate::report::{IntelSource, LookupReport};
use crate::types::{DnsReport, GeoIpData};

/// Embedded WHOIS server mapping (TLD → server).
const WHOIS_SERVERS: &str = include_str!("whois_servers.json");

/// Reduce user input to a bare hostname.
///
/// Removes every `https://` and then every `http://` (case-sensitive), and cuts
/// at the first `/`. No validation happens here: the result may be empty or
/// still malformed.
pub fn normalize_domain(raw: &str) -> String {
    let stripped = raw.replace("https://", "").replace("http://", "");
    stripped
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Entry point for all lookups, holding the clients they share.
///
/// Built once at startup and shared read-only between requests.
///
/// ```rust,no_run
/// use domain_intel_toolbox::{DomainIntelService, LookupConfig};
/// # async fn demo() -> domain_intel_toolbox::ToolboxResult<()> {
/// let service = DomainIntelService::new(LookupConfig::default())?;
/// let report = service.lookup("example.com").await;
/// println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct DomainIntelService {
    config: LookupConfig,
    resolver: TokioResolver,
    crtsh_client: reqwest::Client,
    geoip_client: reqwest::Client,
    whois: WhoIs,
}

impl DomainIntelService {
    pub fn new(config: LookupConfig) -> ToolboxResult<Self> {
        let resolver = resolver::build_system_resolver(config.dns_timeout());
        log::debug!(
            "DNS lookups use {}",
            resolver::system_nameservers().join(", ")
        );

        let crtsh_client = subdomains::build_client(config.crtsh_timeout())?;

        // ip-api.com gets no timeout unless one is configured.
        let mut geoip_builder = reqwest::Client::builder();
        if let Some(timeout) = config.geoip_timeout() {
            geoip_builder = geoip_builder.timeout(timeout);
        }
        let geoip_client = geoip_builder.build().map_err(|e| {
            ToolboxError::NetworkError(format!("Failed to build GeoIP client: {e}"))
        })?;

        let whois = WhoIs::from_string(WHOIS_SERVERS).map_err(|e| {
            ToolboxError::NetworkError(format!("Failed to initialize WHOIS client: {e}"))
        })?;

        Ok(Self {
            config,
            resolver,
            crtsh_client,
            geoip_client,
            whois,
        })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Run all four lookups for an already normalized domain.
    pub async fn lookup(&self, domain: &str) -> LookupReport {
        LookupReport::collect(self, domain).await
    }
}

#[async_trait]
impl IntelSource for DomainIntelService {
    async fn dns_records(&self, domain: &str) -> DnsReport {
        dns::dns_records(&self.resolver, domain).await
    }

    async fn subdomains(&self, domain: &str) -> ToolboxResult<Vec<String>> {
        subdomains::find_subdomains(
            &self.crtsh_client,
            &self.config.crtsh_url,
            domain,
            self.config.subdomain_limit,
        )
        .await
    }

    async fn geoip(&self, domain: &str) -> ToolboxResult<GeoIpData> {
        ip::geoip_lookup(&self.geoip_client, &self.config.geoip_url, domain).await
    }

    async fn whois(&self, domain: &str) -> ToolboxResult<String> {
        whois::whois_lookup(&self.whois, domain, self.config.whois_timeout()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_domain_bare() {
        assert_eq!(normalize_domain("example.com"), "example.com");
    }

    #[test]
    fn test_normalize_domain_strips_scheme_and_path() {
        assert_eq!(
            normalize_domain("https://example.com/path?q=1"),
            "example.com"
        );
        assert_eq!(normalize_domain("http://example.com/"), "example.com");
        assert_eq!(normalize_domain("example.com/a/b"), "example.com");
    }

    #[test]
    fn test_normalize_domain_empty_results() {
        assert_eq!(normalize_domain(""), "");
        assert_eq!(normalize_domain("https://"), "");
        assert_eq!(normalize_domain("http://"), "");
        assert_eq!(normalize_domain("/example.com"), "");
    }

    #[test]
    fn test_normalize_domain_is_case_sensitive() {
        assert_eq!(normalize_domain("HTTPS://example.com"), "HTTPS:");
    }

    #[test]
    fn test_normalize_domain_keeps_port_and_query() {
        assert_eq!(normalize_domain("http://example.com:8080/x"), "example.com:8080");
        assert_eq!(normalize_domain("example.com?q=1"), "example.com?q=1");
    }

    #[test]
    fn test_normalize_domain_removes_nested_schemes() {
        assert_eq!(normalize_domain("http://https://example.com"), "example.com");
    }

    #[test]
    fn test_embedded_whois_servers_load() {
        assert!(WhoIs::from_string(WHOIS_SERVERS).is_ok());
    }

    #[test]
    fn test_embedded_whois_servers_cover_common_tlds() {
        let table: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(WHOIS_SERVERS).unwrap();
        for tld in ["com", "org", "io", "top", "shop", "club", "gg", "live", "cloud", "vip", "id"] {
            assert!(table[tld].is_string() || table[tld].is_object(), "{tld}");
        }
        // Unlisted TLDs fall through to IANA, which refers onward.
        assert_eq!(table[""], "whois.iana.org");
        assert!(table["_"]["ip"].is_object());
    }

    #[tokio::test]
    async fn test_service_builds_with_defaults() {
        let service = DomainIntelService::new(LookupConfig::default()).unwrap();
        assert_eq!(service.config().subdomain_limit, 15);
    }
}
