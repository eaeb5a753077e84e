//! WHOIS lookup module.

use std::io;
use std::time::Duration;

use regex::Regex;
use whois_rust::{WhoIs, WhoIsError, WhoIsLookupOptions, WhoIsServerValue};

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::WhoisRecord;

const IANA_BANNER: &str = "% IANA WHOIS server";

/// Look up `domain` and render the parsed registration data as pretty JSON.
///
/// Domains without a table entry go to IANA first; its `refer:` line names the
/// registry server that is asked next. A response with no recognisable
/// registration field counts as not found.
pub async fn whois_lookup(
    whois: &WhoIs,
    domain: &str,
    timeout: Option<Duration>,
) -> ToolboxResult<String> {
    let mut options = WhoIsLookupOptions::from_string(domain)
        .map_err(|e| ToolboxError::ValidationError(format!("Invalid domain: {e}")))?;
    if timeout.is_some() {
        options.timeout = timeout;
    }

    let mut raw = whois
        .lookup_async(options.clone())
        .await
        .map_err(|e| map_whois_error(domain, &e))?;

    if let Some(referral) = extract_referral(&raw) {
        log::debug!("[whois] {domain} referred to {referral}");
        options.server = Some(WhoIsServerValue::from_string(&referral).map_err(|e| {
            ToolboxError::ParseError(format!("Bad WHOIS referral {referral}: {e}"))
        })?);
        raw = whois
            .lookup_async(options)
            .await
            .map_err(|e| map_whois_error(domain, &e))?;
    } else if raw.contains(IANA_BANNER) {
        return Err(ToolboxError::NotFound(format!(
            "IANA knows no registry WHOIS server for {domain}"
        )));
    }

    let record = parse_whois_response(&raw);
    if record.is_empty() {
        return Err(ToolboxError::NotFound(format!(
            "No registration data for {domain}"
        )));
    }

    serde_json::to_string_pretty(&record)
        .map_err(|e| ToolboxError::ParseError(format!("Failed to format WHOIS data: {e}")))
}

fn map_whois_error(domain: &str, err: &WhoIsError) -> ToolboxError {
    match err {
        WhoIsError::MapError(_) | WhoIsError::HostError(_) => {
            ToolboxError::ValidationError(format!("No WHOIS server for {domain}: {err}"))
        }
        WhoIsError::Elapsed(_) => ToolboxError::Timeout(format!("WHOIS {domain}: {err}")),
        WhoIsError::IOError(e)
            if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) =>
        {
            ToolboxError::Timeout(format!("WHOIS {domain}: {err}"))
        }
        _ => ToolboxError::NetworkError(format!("WHOIS query failed for {domain}: {err}")),
    }
}

/// Registry server named by an IANA `refer:` line.
fn extract_referral(raw: &str) -> Option<String> {
    extract_field(raw, &[r"(?im)^refer:\s*(\S+)"])
}

/// Parse structured fields from a raw WHOIS response.
fn parse_whois_response(raw: &str) -> WhoisRecord {
    WhoisRecord {
        domain_name: extract_field(raw, &[r"(?i)Domain Name:\s*(.+)", r"(?im)^domain:\s*(.+)"]),
        registrar: extract_field(
            raw,
            &[
                r"(?i)Registrar:\s*(.+)",
                r"(?i)Registrar Name:\s*(.+)",
                r"(?i)Sponsoring Registrar:\s*(.+)",
            ],
        ),
        whois_server: extract_field(
            raw,
            &[r"(?i)Registrar WHOIS Server:\s*(.+)", r"(?im)^whois:\s*(.+)"],
        ),
        creation_date: extract_field(
            raw,
            &[
                r"(?i)Creation Date:\s*(.+)",
                r"(?i)Created Date:\s*(.+)",
                r"(?i)Created:\s*(.+)",
                r"(?i)Registration Time:\s*(.+)",
                r"(?i)Registration Date:\s*(.+)",
            ],
        ),
        expiration_date: extract_field(
            raw,
            &[
                r"(?i)Expir(?:y|ation) Date:\s*(.+)",
                r"(?i)Registry Expiry Date:\s*(.+)",
                r"(?i)Expiration Time:\s*(.+)",
                r"(?i)paid-till:\s*(.+)",
            ],
        ),
        updated_date: extract_field(
            raw,
            &[
                r"(?i)Updated Date:\s*(.+)",
                r"(?i)Last Updated:\s*(.+)",
                r"(?i)Last Modified:\s*(.+)",
            ],
        ),
        name_servers: extract_name_servers(raw),
        status: extract_status(raw),
        emails: extract_emails(raw),
        dnssec: extract_field(raw, &[r"(?i)DNSSEC:\s*(.+)"]),
    }
}

/// Try multiple regex patterns and return the first match.
fn extract_field(text: &str, patterns: &[&str]) -> Option<String> {
    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern)
            && let Some(caps) = re.captures(text)
            && let Some(m) = caps.get(1)
        {
            let value = m.as_str().trim().to_string();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// Extract name servers from WHOIS text.
fn extract_name_servers(text: &str) -> Vec<String> {
    let mut servers = Vec::new();
    let patterns = [
        r"(?i)Name Server:\s*(.+)",
        r"(?i)nserver:\s*(.+)",
        r"(?i)DNS:\s*(.+)",
    ];

    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            for caps in re.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    let server = m.as_str().trim().to_lowercase();
                    if !server.is_empty() && !servers.contains(&server) {
                        servers.push(server);
                    }
                }
            }
        }
    }

    servers
}

/// Extract domain status codes from WHOIS text.
fn extract_status(text: &str) -> Vec<String> {
    let mut statuses = Vec::new();
    let patterns = [
        r"(?i)Domain Status:\s*(.+)",
        r"(?i)Status:\s*(.+)",
        r"(?i)state:\s*(.+)",
    ];

    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            for caps in re.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    let status = m.as_str().trim();
                    let status = status.split_whitespace().next().unwrap_or(status).to_string();
                    if !status.is_empty() && !statuses.contains(&status) {
                        statuses.push(status);
                    }
                }
            }
        }
    }

    statuses
}

/// Extract contact e-mail addresses, lowercased and deduplicated.
fn extract_emails(text: &str) -> Vec<String> {
    let mut emails = Vec::new();
    if let Ok(re) = Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}") {
        for m in re.find_iter(text) {
            let email = m.as_str().to_lowercase();
            if !emails.contains(&email) {
                emails.push(email);
            }
        }
    }
    emails
}
