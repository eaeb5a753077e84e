//! Subdomain discovery through the crt.sh certificate-transparency search.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ToolboxError, ToolboxResult};

const SERVICE: &str = "crt.sh";

/// One certificate entry from the crt.sh JSON output.
#[derive(Deserialize)]
struct CrtShEntry {
    /// Newline-separated names covered by the certificate.
    name_value: String,
}

/// HTTP client for crt.sh.
///
/// `timeout` bounds the connect and each socket read, not the whole transfer:
/// crt.sh streams large result sets slowly, and a steady body must not be cut off.
pub(crate) fn build_client(timeout: Duration) -> ToolboxResult<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(timeout)
        .read_timeout(timeout)
        .build()
        .map_err(|e| ToolboxError::NetworkError(format!("Failed to build {SERVICE} client: {e}")))
}

/// Search crt.sh for certificates issued under `domain`.
///
/// Only an HTTP 200 answer is accepted. Wildcard names are skipped and at most
/// `limit` distinct names are returned, in the order crt.sh lists them.
pub async fn find_subdomains(
    client: &reqwest::Client,
    base_url: &str,
    domain: &str,
    limit: usize,
) -> ToolboxResult<Vec<String>> {
    let query = format!("%.{domain}");
    log::debug!("[{SERVICE}] GET {base_url} q={query}");

    let response = client
        .get(base_url)
        .query(&[("q", query.as_str()), ("output", "json")])
        .send()
        .await
        .map_err(|e| ToolboxError::from_request(SERVICE, &e))?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(ToolboxError::UpstreamStatus {
            service: SERVICE.to_string(),
            status,
        });
    }

    let entries: Vec<CrtShEntry> = response
        .json()
        .await
        .map_err(|e| ToolboxError::from_request(SERVICE, &e))?;

    Ok(collect_subdomains(
        entries.iter().map(|entry| entry.name_value.as_str()),
        limit,
    ))
}

/// Split certificate names, drop wildcards and blanks, dedup in first-seen order.
fn collect_subdomains<'a>(name_values: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for name_value in name_values {
        for name in name_value.split('\n').map(str::trim) {
            if found.len() >= limit {
                return found;
            }
            if name.is_empty() || name.contains('*') {
                continue;
            }
            if !found.iter().any(|existing| existing == name) {
                found.push(name.to_string());
            }
        }
    }
    found
}
