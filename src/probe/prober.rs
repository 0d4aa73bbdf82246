use tracing::instrument::WithSubscriber;

use crate::error::{ConfigError, EngineError};
use crate::probe::setting::{ExecMode, ProbeSetting};
use crate::probe::{parallel, serial, CancellationToken};

/// Prober structure.
///
/// Drives HTTP, TCP and DNS attempts according to a [`ProbeSetting`] and
/// streams one report per attempt to the configured sender.
#[derive(Clone, Debug)]
pub struct Prober {
    pub probe_setting: ProbeSetting,
}

impl Prober {
    /// Create a new Prober instance.
    pub fn new(probe_setting: ProbeSetting) -> Self {
        Self { probe_setting }
    }

    /// Validate the setting and run until `count` iterations are done or
    /// `cancel` fires. Cancellation is not an error.
    ///
    /// The report sender is released when this returns, closing the channel.
    pub async fn run(mut self, cancel: &CancellationToken) -> Result<(), EngineError> {
        self.probe_setting.validate()?;
        let logger = self
            .probe_setting
            .logger
            .take()
            .ok_or(ConfigError::MissingProperty("Logger"))?;
        let tx = self
            .probe_setting
            .report_tx
            .take()
            .ok_or(ConfigError::MissingProperty("ReportSender"))?;
        let setting = self.probe_setting;
        async move {
            tracing::info!(
                mode = ?setting.mode,
                protocols = setting.protocols.len(),
                targets = setting.targets.len(),
                count = setting.count,
                "probe run started"
            );
            match setting.mode {
                ExecMode::Serial => serial::run(&setting, &tx, cancel).await,
                ExecMode::Parallel => parallel::run(&setting, &tx, cancel).await,
            }
            tracing::info!("probe run finished");
        }
        .with_subscriber(logger)
        .await;
        Ok(())
    }
}
