//! DNS 查询模块

use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::{ResolveError, TokioResolver};

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{DnsRecordType, DnsReport};

/// Query every [`DnsRecordType`] for `domain`, one after another.
pub async fn dns_records(resolver: &TokioResolver, domain: &str) -> DnsReport {
    let mut report = DnsReport::new();
    for record_type in DnsRecordType::ALL {
        let outcome = lookup_records(resolver, domain, record_type).await;
        report.insert(record_type, outcome);
    }
    report
}

const fn hickory_record_type(record_type: DnsRecordType) -> RecordType {
    match record_type {
        DnsRecordType::A => RecordType::A,
        DnsRecordType::Mx => RecordType::MX,
        DnsRecordType::Ns => RecordType::NS,
        DnsRecordType::Txt => RecordType::TXT,
        DnsRecordType::Cname => RecordType::CNAME,
    }
}

/// Textual rdata of every answer of the queried type.
///
/// Records of other types (e.g. the CNAME chain in front of an A answer) are
/// dropped.
async fn lookup_records(
    resolver: &TokioResolver,
    domain: &str,
    record_type: DnsRecordType,
) -> ToolboxResult<Vec<String>> {
    let rtype = hickory_record_type(record_type);
    let response = resolver
        .lookup(domain, rtype)
        .await
        .map_err(|e| map_resolve_error(domain, record_type, &e))?;

    Ok(response
        .record_iter()
        .filter(|record| record.record_type() == rtype)
        .map(|record| rdata_text(record.data()))
        .collect())
}

/// Zone-file text of one answer. TXT character-strings are each quoted and
/// space-separated (`"a" "b"`); other types use hickory's presentation format.
fn rdata_text(rdata: &RData) -> String {
    match rdata {
        RData::TXT(txt) => txt
            .txt_data()
            .iter()
            .map(|chunk| quote_character_string(chunk))
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

/// Quote one character-string, escaping `"` and `\` and writing
/// non-printable bytes as `\DDD`.
fn quote_character_string(bytes: &[u8]) -> String {
    let mut quoted = String::with_capacity(bytes.len() + 2);
    quoted.push('"');
    for &byte in bytes {
        match byte {
            b'"' | b'\\' => {
                quoted.push('\\');
                quoted.push(char::from(byte));
            }
            0x20..=0x7e => quoted.push(char::from(byte)),
            _ => quoted.push_str(&format!("\\{byte:03}")),
        }
    }
    quoted.push('"');
    quoted
}

fn map_resolve_error(domain: &str, record_type: DnsRecordType, err: &ResolveError) -> ToolboxError {
    if err.is_no_records_found() {
        ToolboxError::NotFound(format!("{record_type} {domain}: {err}"))
    } else {
        ToolboxError::ResolveError(format!("{record_type} {domain}: {err}"))
    }
}
