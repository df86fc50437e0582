//! Shutdown trigger for the wall-clock loop

use std::future::Future;
use std::io;
use std::time::Duration;

use tracing::{info, warn};

/// Resolves on Ctrl-C, or once `run_for` has elapsed when set
pub async fn shutdown_signal(run_for: Option<Duration>) {
    wait_for_shutdown(tokio::signal::ctrl_c(), run_for).await
}

pub(crate) async fn wait_for_shutdown<F>(interrupt: F, run_for: Option<Duration>)
where
    F: Future<Output = io::Result<()>>,
{
    match run_for {
        Some(limit) => {
            tokio::select! {
                _ = until_interrupted(interrupt) => {}
                _ = tokio::time::sleep(limit) => info!("Run time of {:?} reached", limit),
            }
        }
        None => until_interrupted(interrupt).await,
    }
}

/// A handler that cannot be installed never fires
async fn until_interrupted<F>(interrupt: F)
where
    F: Future<Output = io::Result<()>>,
{
    match interrupt.await {
        Ok(()) => info!("Interrupt received"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C, interrupt disabled: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Instant};

    fn failed() -> impl Future<Output = io::Result<()>> {
        async { Err(io::Error::new(io::ErrorKind::Other, "no signal driver")) }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupt_resolves() {
        let started = Instant::now();
        wait_for_shutdown(async { Ok(()) }, Some(Duration::from_secs(60))).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_handler_waits_for_run_time() {
        let started = Instant::now();
        wait_for_shutdown(failed(), Some(Duration::from_secs(5))).await;
        assert!(started.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_handler_without_run_time_keeps_running() {
        let waited = timeout(Duration::from_secs(3600), wait_for_shutdown(failed(), None)).await;
        assert!(waited.is_err());
    }
}
