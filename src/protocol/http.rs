use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::db::server::random_captive_portal;
use crate::error::{ConfigError, ProbeError};
use crate::protocol::Probe;

/// HTTP GET probe against a URL, by default a random captive portal.
#[derive(Clone, Debug)]
pub struct HttpProbe {
    client: Client,
}

impl HttpProbe {
    pub const ID: &'static str = "http";

    /// Create a new HTTP probe. Idle connections are never kept, so every
    /// attempt opens a fresh connection.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self { client })
    }

    /// The extra information is the response status line, e.g. "204 No Content".
    pub async fn probe(&self, target: &str) -> Result<Probe, ProbeError> {
        let url = if target.is_empty() {
            random_captive_portal()
                .ok_or(ProbeError::SelectTarget("captive portal"))?
                .to_string()
        } else {
            target.to_string()
        };
        tracing::debug!(url = %url, "HTTP GET");
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|source| ProbeError::Http {
                url: url.clone(),
                source,
            })?;
        Ok(Probe {
            extra: status_line(response.status()),
            target: url,
        })
    }
}

/// Format a status code as a status line without the protocol version.
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
