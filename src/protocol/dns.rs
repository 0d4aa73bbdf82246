use std::net::SocketAddr;
use std::time::Duration;

use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use tokio::time::timeout;

use crate::db::server::random_domain;
use crate::error::ProbeError;
use crate::protocol::Probe;

/// DNS resolution probe for a domain, by default a random well-known one.
#[derive(Clone, Debug)]
pub struct DnsProbe {
    timeout: Duration,
    /// Resolver queried instead of the system configuration.
    resolver: Option<SocketAddr>,
}

impl DnsProbe {
    pub const ID: &'static str = "dns";

    pub fn new(timeout: Duration, resolver: Option<SocketAddr>) -> Self {
        Self { timeout, resolver }
    }

    /// Build a fresh resolver so no answer is ever served from a cache.
    fn build_resolver(&self) -> Result<TokioResolver, ProbeError> {
        let mut builder = match self.resolver {
            Some(addr) => {
                let servers = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
                TokioResolver::builder_with_config(
                    ResolverConfig::from_parts(None, vec![], servers),
                    TokioConnectionProvider::default(),
                )
            }
            None => TokioResolver::builder_tokio().map_err(ProbeError::ResolverSetup)?,
        };
        let opts = builder.options_mut();
        opts.timeout = self.timeout;
        opts.attempts = 1;
        Ok(builder.build())
    }

    /// The extra information is the first resolved IP address.
    pub async fn probe(&self, target: &str) -> Result<Probe, ProbeError> {
        let domain = if target.is_empty() {
            random_domain().ok_or(ProbeError::SelectTarget("domain"))?
        } else {
            target.to_string()
        };
        let resolver = self.build_resolver()?;
        tracing::debug!(domain = %domain, resolver = ?self.resolver, "DNS lookup");
        let lookup = match timeout(self.timeout, resolver.lookup_ip(domain.as_str())).await {
            Ok(Ok(lookup)) => lookup,
            Ok(Err(source)) => return Err(ProbeError::Resolve { domain, source }),
            Err(_) => {
                return Err(ProbeError::Timeout {
                    target: domain,
                    timeout: self.timeout,
                })
            }
        };
        match lookup.iter().next() {
            Some(ip) => Ok(Probe {
                target: domain,
                extra: ip.to_string(),
            }),
            None => Err(ProbeError::NoAddress { domain }),
        }
    }
}
