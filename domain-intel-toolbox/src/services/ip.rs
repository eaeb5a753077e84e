//! IP geolocation lookup module.

use std::net::{IpAddr, Ipv4Addr};

use serde_json::Value;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::GeoIpData;

const SERVICE: &str = "ip-api.com";

/// Resolve `domain` through the system resolver and take its first IPv4 address.
///
/// IPv4 literals pass through without a query.
async fn resolve_ipv4(domain: &str) -> ToolboxResult<Ipv4Addr> {
    let addrs = tokio::net::lookup_host((domain, 0))
        .await
        .map_err(|e| ToolboxError::ResolveError(format!("Failed to resolve {domain}: {e}")))?;

    addrs
        .filter_map(|addr| match addr.ip() {
            IpAddr::V4(ip) => Some(ip),
            IpAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| ToolboxError::ResolveError(format!("No IPv4 address for {domain}")))
}

/// Geolocate `domain` and return the upstream JSON object untouched.
///
/// The HTTP status and the service's own `status` field are not inspected;
/// only a body that is not a JSON object counts as a failure.
pub async fn geoip_lookup(
    client: &reqwest::Client,
    base_url: &str,
    domain: &str,
) -> ToolboxResult<GeoIpData> {
    let ip = resolve_ipv4(domain).await?;
    let url = format!("{base_url}{ip}");
    log::debug!("[{SERVICE}] GET {url}");

    let body: Value = client
        .get(&url)
        .send()
        .await
        .map_err(|e| ToolboxError::from_request(SERVICE, &e))?
        .json()
        .await
        .map_err(|e| ToolboxError::from_request(SERVICE, &e))?;

    match body {
        Value::Object(data) => Ok(data),
        other => Err(ToolboxError::ParseError(format!(
            "{SERVICE}: expected a JSON object, got {other}"
        ))),
    }
}
