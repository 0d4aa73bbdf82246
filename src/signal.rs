use anyhow::Result;

use crate::probe::CancellationToken;

/// Wait for SIGINT (Ctrl+C) or, on unix, SIGTERM.
async fn termination() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = term.recv() => {}
        }
    }
    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;
    Ok(())
}

/// Cancel `token` on the first termination signal.
pub fn spawn_signal_handler(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!("listening for termination signals");
        match termination().await {
            Ok(()) => {
                if token.cancel() {
                    tracing::debug!("termination signal received");
                }
            }
            Err(e) => tracing::error!("failed to listen for signals: {:#}", e),
        }
    })
}
