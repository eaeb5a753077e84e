//! Lookup configuration: upstream endpoints, timeouts and limits.

use std::time::Duration;

use serde::Deserialize;

/// Settings for the four upstream lookups.
///
/// Every field has a default, so a partial `[lookup]` table (or none at all)
/// is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Certificate-transparency search endpoint (crt.sh).
    pub crtsh_url: String,
    /// crt.sh connect timeout and maximum gap between body reads, in seconds.
    pub crtsh_timeout_secs: u64,
    /// Maximum number of subdomains returned.
    pub subdomain_limit: usize,
    /// GeoIP endpoint prefix; the IP address is appended to it.
    pub geoip_url: String,
    /// Timeout for the GeoIP request. `None` means the request may block
    /// for as long as the upstream keeps the connection open.
    pub geoip_timeout_secs: Option<u64>,
    /// Per-query DNS timeout. `None` keeps the resolver default.
    pub dns_timeout_secs: Option<u64>,
    /// WHOIS socket timeout. `None` keeps the client default.
    pub whois_timeout_secs: Option<u64>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            crtsh_url: "https://crt.sh/".to_string(),
            crtsh_timeout_secs: 5,
            subdomain_limit: 15,
            geoip_url: "http://ip-api.com/json/".to_string(),
            geoip_timeout_secs: None,
            dns_timeout_secs: None,
            whois_timeout_secs: None,
        }
    }
}

impl LookupConfig {
    pub(crate) fn crtsh_timeout(&self) -> Duration {
        Duration::from_secs(self.crtsh_timeout_secs)
    }

    pub(crate) fn geoip_timeout(&self) -> Option<Duration> {
        self.geoip_timeout_secs.map(Duration::from_secs)
    }

    pub(crate) fn dns_timeout(&self) -> Option<Duration> {
        self.dns_timeout_secs.map(Duration::from_secs)
    }

    pub(crate) fn whois_timeout(&self) -> Option<Duration> {
        self.whois_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_public_services() {
        let config = LookupConfig::default();
        assert_eq!(config.crtsh_url, "https://crt.sh/");
        assert_eq!(config.crtsh_timeout(), Duration::from_secs(5));
        assert_eq!(config.subdomain_limit, 15);
        assert_eq!(config.geoip_url, "http://ip-api.com/json/");
        assert!(config.geoip_timeout().is_none());
        assert!(config.dns_timeout().is_none());
        assert!(config.whois_timeout().is_none());
    }

    #[test]
    fn test_partial_deserialization_keeps_defaults() {
        let config: LookupConfig =
            serde_json::from_str(r#"{"subdomain_limit": 7, "geoip_timeout_secs": 10}"#).unwrap();
        assert_eq!(config.subdomain_limit, 7);
        assert_eq!(config.geoip_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.crtsh_url, "https://crt.sh/");
    }
}
