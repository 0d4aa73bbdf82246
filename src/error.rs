//! Error types for configuration, probe attempts and the probe engine.

use std::time::Duration;
use thiserror::Error;

/// Structural misconfiguration. Always detected before any network I/O.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required property: {0}")]
    MissingProperty(&'static str),

    #[error("duplicate protocol: {0}")]
    DuplicateProtocol(String),

    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid DNS resolver address: {0}")]
    InvalidResolver(String),

    #[error("invalid address format: {0}")]
    InvalidAddress(String),

    #[error("protocol is required if target is set")]
    TargetWithoutProtocol,

    #[error("no network interfaces found")]
    NoInterfaces,

    #[error("building HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

/// Failure of a single probe attempt.
///
/// Display strings describe only this layer; the underlying cause stays
/// reachable through `source()` so the whole chain can be rendered.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("selecting default target: no {0} available")]
    SelectTarget(&'static str),

    #[error("requesting {url}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("connecting to {target}")]
    Connect {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("reading local address of connection to {target}")]
    LocalAddr {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("closing connection to {target}")]
    Close {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("creating DNS resolver")]
    ResolverSetup(#[source] hickory_resolver::ResolveError),

    #[error("resolving {domain}")]
    Resolve {
        domain: String,
        #[source]
        source: hickory_resolver::ResolveError,
    },

    #[error("resolving {domain}: no addresses returned")]
    NoAddress { domain: String },

    #[error("{target}: timed out after {timeout:?}")]
    Timeout { target: String, timeout: Duration },
}

impl ProbeError {
    /// Target the failed attempt was directed at, when one had been chosen.
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::SelectTarget(_) | Self::ResolverSetup(_) => None,
            Self::Http { url, .. } => Some(url),
            Self::Connect { target, .. }
            | Self::LocalAddr { target, .. }
            | Self::Close { target, .. }
            | Self::Timeout { target, .. } => Some(target),
            Self::Resolve { domain, .. } | Self::NoAddress { domain } => Some(domain),
        }
    }

    /// Render this error followed by every cause in its source chain.
    pub fn chain(self) -> String {
        format!("{:#}", anyhow::Error::new(self))
    }
}

/// Error returned by the probe engine entry point.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid setup: {0}")]
    InvalidSetup(#[from] ConfigError),
}
