pub mod compile;
pub mod dns_config;
pub mod probe;
pub mod service;

use dnsprobe_domain::{ExecutionVariant, HostAlias};
use std::collections::BTreeMap;

/// `key=value`, as given to `--label` and `--selector`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

/// `ALIAS` or `ALIAS=CANONICAL`; a bare alias must canonicalise to itself.
pub fn parse_host(raw: &str) -> Result<HostAlias, String> {
    match raw.split_once('=') {
        Some((alias, expected)) if !alias.is_empty() && !expected.is_empty() => {
            Ok(HostAlias::new(alias, expected))
        }
        Some(_) => Err(format!("expected ALIAS or ALIAS=CANONICAL, got '{raw}'")),
        None if raw.is_empty() => Err("host alias must not be empty".to_string()),
        None => Ok(HostAlias::from(raw)),
    }
}

pub fn to_map(pairs: &[(String, String)]) -> BTreeMap<String, String> {
    pairs.iter().cloned().collect()
}

/// Requested variants, or every configured variant when none were named.
pub fn variants(
    requested: &[String],
    configured: &[String],
) -> anyhow::Result<Vec<ExecutionVariant>> {
    let names = if requested.is_empty() {
        configured
    } else {
        requested
    };
    names
        .iter()
        .map(|name| ExecutionVariant::new(name).map_err(anyhow::Error::from))
        .collect()
}
