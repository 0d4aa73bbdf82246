use std::net::SocketAddrV4;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;

use crate::error::ConfigError;

static IPV4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("IPv4 pattern"));

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9-]{1,61}[a-zA-Z0-9]\.[a-zA-Z]{2,}$").expect("domain pattern")
});

/// Accept an absolute URL, an IPv4 address, an IPv4 `ip:port` pair or a domain.
pub fn validate_target(v: &str) -> Result<(), ConfigError> {
    if Url::parse(v).is_ok()
        || IPV4_RE.is_match(v)
        || v.parse::<SocketAddrV4>().is_ok()
        || DOMAIN_RE.is_match(v)
    {
        return Ok(());
    }
    Err(ConfigError::InvalidAddress(v.to_string()))
}

/// Split `input` on whitespace and validate every token.
///
/// Valid tokens are kept in order; each invalid one yields its own error.
pub fn process_targets(input: &str) -> (Vec<String>, Vec<ConfigError>) {
    let mut targets = Vec::new();
    let mut errors = Vec::new();
    for token in input.split_whitespace() {
        match validate_target(token) {
            Ok(()) => targets.push(token.to_string()),
            Err(e) => errors.push(e),
        }
    }
    (targets, errors)
}
