//! DNS resolver construction.

use std::time::Duration;

use hickory_resolver::{
    TokioResolver,
    config::{ResolverConfig, ResolverOpts},
    name_server::TokioConnectionProvider,
};

/// Deduplicate nameserver IP addresses from a resolver configuration.
pub(crate) fn dedup_ips(config: &ResolverConfig) -> Vec<String> {
    let mut ips: Vec<String> = Vec::new();
    for ns in config.name_servers() {
        let ip = ns.socket_addr.ip().to_string();
        if !ips.contains(&ip) {
            ips.push(ip);
        }
    }
    ips
}

/// Nameservers the system resolver will use, for logging.
pub(crate) fn system_nameservers() -> Vec<String> {
    #[cfg(any(unix, target_os = "windows"))]
    {
        if let Ok((config, _opts)) = hickory_resolver::system_conf::read_system_conf() {
            let ips = dedup_ips(&config);
            if !ips.is_empty() {
                return ips;
            }
        }
    }

    dedup_ips(&ResolverConfig::default())
}

/// Build a resolver from the host system DNS configuration.
///
/// Falls back to Hickory's default upstream set (Google Public DNS) when the
/// system configuration cannot be loaded. `timeout` overrides the per-query
/// timeout; `None` keeps the resolver default.
pub(crate) fn build_system_resolver(timeout: Option<Duration>) -> TokioResolver {
    #[cfg(any(unix, target_os = "windows"))]
    {
        match TokioResolver::builder_tokio() {
            Ok(mut builder) => {
                if let Some(timeout) = timeout {
                    builder.options_mut().timeout = timeout;
                }
                return builder.build();
            }
            Err(e) => {
                log::warn!(
                    "Failed to load system DNS configuration, falling back to defaults: {e}"
                );
            }
        }
    }

    let provider = TokioConnectionProvider::default();
    let mut opts = ResolverOpts::default();
    if let Some(timeout) = timeout {
        opts.timeout = timeout;
    }
    TokioResolver::builder_with_config(ResolverConfig::default(), provider)
        .with_options(opts)
        .build()
}
