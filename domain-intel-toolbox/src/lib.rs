//! Domain intelligence lookups for the Domain Intel service.
//!
//! 提供四种相互独立的查询：DNS 记录、证书透明日志子域名、GeoIP、WHOIS，
//! 以及把它们汇总成一份 [`LookupReport`] 的编排逻辑。
//! 每个查询都返回显式的 `Result`，失败只在序列化时才折叠成兼容的默认值。

mod config;
mod error;
mod report;
mod services;
mod types;

pub use config::LookupConfig;
pub use error::{ToolboxError, ToolboxResult};
pub use report::{GEOIP_ERROR_MESSAGE, IntelSource, LookupReport, WHOIS_FALLBACK_MESSAGE};
pub use services::{DomainIntelService, normalize_domain};
pub use types::{DnsRecordType, DnsReport, GeoIpData, WhoisRecord};
