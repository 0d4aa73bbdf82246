pub mod cancel;
pub mod parallel;
pub mod prober;
pub mod result;
pub mod serial;
pub mod setting;

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::error::ProbeError;
use crate::probe::result::Report;
use crate::protocol::Protocol;

pub use cancel::CancellationToken;
pub use prober::Prober;
pub use setting::{ExecMode, ProbeSetting};

/// Run one attempt, bounded by `timeout`, and time it. Returns `None` if
/// cancelled before the attempt finished; the partial attempt is discarded.
pub(crate) async fn attempt(
    protocol: &Protocol,
    target: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Option<Report> {
    let start = Instant::now();
    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => return None,
        outcome = tokio::time::timeout(timeout, protocol.probe(target)) => match outcome {
            Ok(outcome) => outcome,
            Err(_) => Err(ProbeError::Timeout {
                target: target.to_string(),
                timeout,
            }),
        },
    };
    let elapsed = start.elapsed();
    let report = Report::from_outcome(protocol.id(), target, elapsed, outcome);
    tracing::debug!(
        protocol = protocol.id(),
        target = %report.rhost,
        elapsed = ?elapsed,
        success = report.is_success(),
        "attempt finished"
    );
    Some(report)
}

/// Hand a report to the consumer, waiting while the channel is full.
/// Returns `false` when the run must stop: cancelled, or nobody is listening.
pub(crate) async fn publish(
    tx: &mpsc::Sender<Report>,
    report: Report,
    cancel: &CancellationToken,
) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = tx.send(report) => {
            if sent.is_err() {
                tracing::debug!("report receiver closed");
            }
            sent.is_ok()
        }
    }
}

/// Wait `delay`. Returns `false` if cancelled while waiting.
pub(crate) async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
