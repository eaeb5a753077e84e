//! Public types returned by toolbox operations.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ToolboxError, ToolboxResult};

/// Upstream GeoIP payload, passed through untouched.
pub type GeoIpData = serde_json::Map<String, serde_json::Value>;

/// DNS record types included in every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Text record.
    Txt,
    /// Canonical name (alias) record.
    Cname,
}

impl DnsRecordType {
    /// All record types, in report order.
    pub const ALL: [Self; 5] = [Self::A, Self::Mx, Self::Ns, Self::Txt, Self::Cname];

    /// Upper-case record type name, also used as the report key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Txt => "TXT",
            Self::Cname => "CNAME",
        }
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DnsRecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "MX" => Ok(Self::Mx),
            "NS" => Ok(Self::Ns),
            "TXT" => Ok(Self::Txt),
            "CNAME" => Ok(Self::Cname),
            _ => Err(format!("Unsupported DNS record type: {s}")),
        }
    }
}

/// Per-type DNS lookup outcomes for one domain.
///
/// Serializes as an object with exactly one key per [`DnsRecordType`]; a failed
/// or missing type becomes an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsReport {
    entries: Vec<(DnsRecordType, ToolboxResult<Vec<String>>)>,
}

impl DnsReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for `record_type`, replacing any earlier one.
    pub fn insert(&mut self, record_type: DnsRecordType, outcome: ToolboxResult<Vec<String>>) {
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| *t == record_type) {
            entry.1 = outcome;
        } else {
            self.entries.push((record_type, outcome));
        }
    }

    pub fn get(&self, record_type: DnsRecordType) -> Option<&ToolboxResult<Vec<String>>> {
        self.entries
            .iter()
            .find(|(t, _)| *t == record_type)
            .map(|(_, outcome)| outcome)
    }

    /// Record values for `record_type`; empty when the lookup failed.
    pub fn records(&self, record_type: DnsRecordType) -> &[String] {
        match self.get(record_type) {
            Some(Ok(values)) => values.as_slice(),
            _ => &[],
        }
    }

    /// Failed lookups with their causes.
    pub fn failures(&self) -> impl Iterator<Item = (DnsRecordType, &ToolboxError)> {
        self.entries.iter().filter_map(|(t, outcome)| match outcome {
            Err(e) => Some((*t, e)),
            Ok(_) => None,
        })
    }
}

impl Serialize for DnsReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(DnsRecordType::ALL.len()))?;
        for record_type in DnsRecordType::ALL {
            map.serialize_entry(record_type.as_str(), self.records(record_type))?;
        }
        map.end()
    }
}

/// Registration fields parsed from a raw WHOIS response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisRecord {
    /// Domain name as reported by the registry.
    pub domain_name: Option<String>,
    /// Domain registrar (e.g. "Cloudflare, Inc.").
    pub registrar: Option<String>,
    /// Registrar WHOIS server.
    pub whois_server: Option<String>,
    /// Registration creation date.
    pub creation_date: Option<String>,
    /// Registration expiration date.
    pub expiration_date: Option<String>,
    /// Last updated date.
    pub updated_date: Option<String>,
    /// Authoritative name servers.
    pub name_servers: Vec<String>,
    /// EPP status codes.
    pub status: Vec<String>,
    /// Contact e-mail addresses.
    pub emails: Vec<String>,
    /// DNSSEC delegation state.
    pub dnssec: Option<String>,
}

impl WhoisRecord {
    /// `true` when no registration field could be extracted.
    pub fn is_empty(&self) -> bool {
        self.domain_name.is_none()
            && self.registrar.is_none()
            && self.creation_date.is_none()
            && self.expiration_date.is_none()
            && self.updated_date.is_none()
            && self.name_servers.is_empty()
            && self.status.is_empty()
    }
}
