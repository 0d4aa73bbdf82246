use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::db::server::random_tcp_server;
use crate::error::ProbeError;
use crate::protocol::Probe;

/// TCP connect probe against a `host:port`, by default a random public DNS server.
#[derive(Clone, Debug)]
pub struct TcpProbe {
    timeout: Duration,
}

impl TcpProbe {
    pub const ID: &'static str = "tcp";

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The extra information is the local address the connection was bound to.
    pub async fn probe(&self, target: &str) -> Result<Probe, ProbeError> {
        let host_port = if target.is_empty() {
            random_tcp_server().ok_or(ProbeError::SelectTarget("DNS server"))?
        } else {
            target.to_string()
        };
        tracing::debug!(target = %host_port, "TCP connect");
        let mut stream = match timeout(self.timeout, TcpStream::connect(host_port.as_str())).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => {
                return Err(ProbeError::Connect {
                    target: host_port,
                    source,
                })
            }
            Err(_) => {
                return Err(ProbeError::Timeout {
                    target: host_port,
                    timeout: self.timeout,
                })
            }
        };
        let local_addr = match stream.local_addr() {
            Ok(addr) => addr,
            Err(source) => {
                return Err(ProbeError::LocalAddr {
                    target: host_port,
                    source,
                })
            }
        };
        if let Err(source) = stream.shutdown().await {
            return Err(ProbeError::Close {
                target: host_port,
                source,
            });
        }
        Ok(Probe {
            target: host_port,
            extra: local_addr.to_string(),
        })
    }
}
