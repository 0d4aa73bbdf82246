use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::Dispatch;

use crate::config::default::{DEFAULT_COUNT, DEFAULT_DELAY, DEFAULT_TIMEOUT};
use crate::error::ConfigError;
use crate::probe::result::Report;
use crate::protocol::Protocol;

/// How attempts of one iteration are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// One attempt at a time, in target-major, protocol-minor order.
    #[default]
    Serial,
    /// One task per (target, protocol), at most one in flight per protocol.
    Parallel,
}

/// Configuration of a probe run.
#[derive(Clone, Debug)]
pub struct ProbeSetting {
    pub protocols: Vec<Protocol>,
    /// Explicit targets. When empty, every protocol picks its own default.
    pub targets: Vec<String>,
    /// Number of iterations. 0 runs until cancelled.
    pub count: u64,
    pub delay: Duration,
    pub timeout: Duration,
    pub mode: ExecMode,
    pub logger: Option<Dispatch>,
    pub report_tx: Option<mpsc::Sender<Report>>,
}

impl Default for ProbeSetting {
    fn default() -> Self {
        Self {
            protocols: Vec::new(),
            targets: Vec::new(),
            count: DEFAULT_COUNT,
            delay: DEFAULT_DELAY,
            timeout: DEFAULT_TIMEOUT,
            mode: ExecMode::Serial,
            logger: None,
            report_tx: None,
        }
    }
}

impl ProbeSetting {
    /// Check the setting, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.protocols.is_empty() {
            return Err(ConfigError::MissingProperty("Protocols"));
        }
        let mut seen = HashSet::new();
        for protocol in &self.protocols {
            if !seen.insert(protocol.id()) {
                return Err(ConfigError::DuplicateProtocol(protocol.id().to_string()));
            }
        }
        if self.logger.is_none() {
            return Err(ConfigError::MissingProperty("Logger"));
        }
        if self.report_tx.is_none() {
            return Err(ConfigError::MissingProperty("ReportSender"));
        }
        Ok(())
    }

    /// Targets probed in each iteration. A single empty target stands for
    /// "let the protocol choose".
    pub fn effective_targets(&self) -> Vec<String> {
        if self.targets.is_empty() {
            vec![String::new()]
        } else {
            self.targets.clone()
        }
    }
}
