use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;
use crate::protocol::Probe;

mod duration_nanos {
    use super::*;
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
        nanos.serialize(s)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u64::deserialize(d)?;
        Ok(Duration::from_nanos(nanos))
    }
}

/// Outcome of one probe attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub protocol: String,
    /// Target that was attempted.
    pub rhost: String,
    /// Wall-clock duration of the attempt, in nanoseconds on the wire.
    #[serde(with = "duration_nanos")]
    pub time: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Report {
    /// Build a report from an attempt outcome. `target` is what the attempt
    /// was asked to probe and is used when the error does not name one.
    pub fn from_outcome(
        protocol: &str,
        target: &str,
        time: Duration,
        outcome: Result<Probe, ProbeError>,
    ) -> Self {
        match outcome {
            Ok(probe) => Report {
                protocol: protocol.to_string(),
                rhost: probe.target,
                time,
                extra: Some(probe.extra),
                error: None,
            },
            Err(err) => Report {
                protocol: protocol.to_string(),
                rhost: err.target().unwrap_or(target).to_string(),
                time,
                extra: None,
                error: Some(err.chain()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
