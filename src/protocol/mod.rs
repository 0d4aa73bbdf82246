//! Wire protocols used to probe connectivity.
//!
//! Every protocol exposes the same contract: given a target (or an empty
//! string to let the protocol pick a random public server) it performs exactly
//! one attempt and returns the target it used plus protocol specific extra
//! information.

pub mod dns;
pub mod http;
#[cfg(test)]
pub mod stub;
pub mod tcp;

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::config::default::{DEFAULT_DNS_PORT, DEFAULT_TIMEOUT};
use crate::error::{ConfigError, ProbeError};

pub use dns::DnsProbe;
pub use http::HttpProbe;
pub use tcp::TcpProbe;

/// Identifiers of the built-in protocols, in default execution order.
pub const PROTOCOL_IDS: [&str; 3] = [HttpProbe::ID, TcpProbe::ID, DnsProbe::ID];

/// Successful outcome of a single attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Probe {
    /// Target actually attempted (URL, host:port or domain).
    pub target: String,
    /// HTTP status line, TCP local address or first resolved IP.
    pub extra: String,
}

/// Settings shared by protocol constructors.
#[derive(Clone, Debug)]
pub struct ProtocolOptions {
    pub timeout: Duration,
    /// Custom resolver for the DNS protocol only.
    pub dns_resolver: Option<SocketAddr>,
}

impl Default for ProtocolOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            dns_resolver: None,
        }
    }
}

/// A probe-capable protocol.
#[derive(Clone, Debug)]
pub enum Protocol {
    Http(HttpProbe),
    Tcp(TcpProbe),
    Dns(DnsProbe),
    #[cfg(test)]
    Stub(stub::StubProbe),
}

impl Protocol {
    /// Build a protocol from its identifier.
    pub fn from_id(id: &str, opts: &ProtocolOptions) -> Result<Protocol, ConfigError> {
        match id.to_lowercase().as_str() {
            HttpProbe::ID => Ok(Protocol::Http(HttpProbe::new(opts.timeout)?)),
            TcpProbe::ID => Ok(Protocol::Tcp(TcpProbe::new(opts.timeout))),
            DnsProbe::ID => Ok(Protocol::Dns(DnsProbe::new(opts.timeout, opts.dns_resolver))),
            _ => Err(ConfigError::UnknownProtocol(id.to_string())),
        }
    }

    /// Build every built-in protocol.
    pub fn all(opts: &ProtocolOptions) -> Result<Vec<Protocol>, ConfigError> {
        PROTOCOL_IDS
            .iter()
            .map(|id| Protocol::from_id(id, opts))
            .collect()
    }

    /// Identifier of the protocol, e.g. "http".
    pub fn id(&self) -> &str {
        match self {
            Protocol::Http(_) => HttpProbe::ID,
            Protocol::Tcp(_) => TcpProbe::ID,
            Protocol::Dns(_) => DnsProbe::ID,
            #[cfg(test)]
            Protocol::Stub(stub) => stub.id.as_str(),
        }
    }

    /// Perform a single attempt against `target`.
    ///
    /// An empty target makes the protocol select a random public server.
    pub async fn probe(&self, target: &str) -> Result<Probe, ProbeError> {
        match self {
            Protocol::Http(http) => http.probe(target).await,
            Protocol::Tcp(tcp) => tcp.probe(target).await,
            Protocol::Dns(dns) => dns.probe(target).await,
            #[cfg(test)]
            Protocol::Stub(stub) => stub.probe(target).await,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Parse a resolver address given as `ip` or `ip:port`.
pub fn parse_resolver(s: &str) -> Result<SocketAddr, ConfigError> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    s.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, DEFAULT_DNS_PORT))
        .map_err(|_| ConfigError::InvalidResolver(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        let opts = ProtocolOptions::default();
        for id in PROTOCOL_IDS {
            let protocol = Protocol::from_id(id, &opts).unwrap();
            assert_eq!(protocol.id(), id);
            assert_eq!(protocol.to_string(), id);
        }
        assert_eq!(Protocol::from_id("TCP", &opts).unwrap().id(), "tcp");
    }

    #[test]
    fn test_from_id_unknown() {
        let err = Protocol::from_id("icmp", &ProtocolOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "unknown protocol: icmp");
    }

    #[test]
    fn test_all_keeps_order() {
        let ids: Vec<String> = Protocol::all(&ProtocolOptions::default())
            .unwrap()
            .iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(ids, vec!["http", "tcp", "dns"]);
    }

    #[test]
    fn test_parse_resolver() {
        assert_eq!(
            parse_resolver("1.1.1.1").unwrap(),
            "1.1.1.1:53".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            parse_resolver("9.9.9.9:5353").unwrap(),
            "9.9.9.9:5353".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            parse_resolver("::1").unwrap(),
            "[::1]:53".parse::<SocketAddr>().unwrap()
        );
        assert!(matches!(
            parse_resolver("dns.google"),
            Err(ConfigError::InvalidResolver(_))
        ));
    }
}
