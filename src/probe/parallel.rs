use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, Semaphore};
use tracing::instrument::WithSubscriber;

use crate::probe::result::Report;
use crate::probe::setting::ProbeSetting;
use crate::probe::{attempt, pause, publish, CancellationToken};
use crate::protocol::Protocol;

/// One (target, protocol) attempt of an iteration.
struct Worker {
    protocol: Protocol,
    target: String,
    timeout: Duration,
    delay: Duration,
    gate: Arc<Semaphore>,
    tx: mpsc::Sender<Report>,
    cancel: CancellationToken,
}

impl Worker {
    async fn run(self) {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return,
            permit = self.gate.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return,
            },
        };
        if self.cancel.is_cancelled() {
            return;
        }
        let Some(report) =
            attempt(&self.protocol, &self.target, self.timeout, &self.cancel).await
        else {
            return;
        };
        if !publish(&self.tx, report, &self.cancel).await {
            return;
        }
        // The slot stays taken while pausing, pacing this protocol.
        pause(self.delay, &self.cancel).await;
    }
}

/// Run the attempts of each iteration concurrently, with at most as many in
/// flight as there are protocols. No ordering between reports.
pub async fn run(setting: &ProbeSetting, tx: &mpsc::Sender<Report>, cancel: &CancellationToken) {
    let targets = setting.effective_targets();
    let gate = Arc::new(Semaphore::new(setting.protocols.len()));
    let mut iteration: u64 = 0;
    loop {
        if cancel.is_cancelled() {
            tracing::debug!(count = iteration, "cancelled before iteration");
            return;
        }
        if tx.is_closed() {
            tracing::debug!(count = iteration, "report receiver closed");
            return;
        }
        tracing::debug!(count = iteration, "starting iteration");
        let mut handles = Vec::with_capacity(targets.len() * setting.protocols.len());
        for target in &targets {
            for protocol in &setting.protocols {
                let worker = Worker {
                    protocol: protocol.clone(),
                    target: target.clone(),
                    timeout: setting.timeout,
                    delay: setting.delay,
                    gate: gate.clone(),
                    tx: tx.clone(),
                    cancel: cancel.clone(),
                };
                handles.push(tokio::spawn(worker.run().with_current_subscriber()));
            }
        }
        for joined in join_all(handles).await {
            if let Err(e) = joined {
                tracing::error!(count = iteration, "probe worker failed: {}", e);
            }
        }
        iteration += 1;
        if setting.count > 0 && iteration == setting.count {
            tracing::debug!(count = iteration, "all iterations done");
            return;
        }
    }
}
