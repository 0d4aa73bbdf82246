use tokio::sync::mpsc;

use crate::probe::result::Report;
use crate::probe::setting::ProbeSetting;
use crate::probe::{attempt, pause, publish, CancellationToken};

/// Run every attempt one after another. Reports arrive in issue order:
/// iteration, then target, then protocol.
pub async fn run(setting: &ProbeSetting, tx: &mpsc::Sender<Report>, cancel: &CancellationToken) {
    let targets = setting.effective_targets();
    let mut iteration: u64 = 0;
    loop {
        if cancel.is_cancelled() {
            tracing::debug!(count = iteration, "cancelled before iteration");
            return;
        }
        tracing::debug!(count = iteration, "starting iteration");
        for target in &targets {
            for protocol in &setting.protocols {
                if cancel.is_cancelled() {
                    return;
                }
                tracing::debug!(count = iteration, protocol = protocol.id(), target = %target, "probing");
                let Some(report) = attempt(protocol, target, setting.timeout, cancel).await else {
                    return;
                };
                if !publish(tx, report, cancel).await {
                    return;
                }
                if !pause(setting.delay, cancel).await {
                    return;
                }
            }
        }
        iteration += 1;
        if setting.count > 0 && iteration == setting.count {
            tracing::debug!(count = iteration, "all iterations done");
            return;
        }
    }
}
