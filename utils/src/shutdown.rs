//! Graceful shutdown on SIGINT / SIGTERM.
//!
//! One [`ShutdownController`] per process. The HTTP server awaits
//! [`ShutdownController::signalled`] to stop accepting connections and drain
//! in-flight requests; other tasks may [`subscribe`](ShutdownController::subscribe)
//! and `select!` on the receiver.

use std::future::Future;

use tokio::signal;
use tokio::sync::broadcast;

pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// A future that completes once shutdown has been triggered. Subscribes
    /// immediately, so a trigger after this call is never missed.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.subscribe();
        async move {
            // A closed channel means the controller is gone; stop either way.
            let _ = rx.recv().await;
        }
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(());
    }

    /// Block until the process receives SIGINT or SIGTERM, then trigger
    /// shutdown.
    pub async fn wait_for_signal(&self) {
        #[cfg(unix)]
        let sigterm = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "SIGTERM handler unavailable; only SIGINT stops the daemon");
                    std::future::pending::<()>().await;
                }
            }
        };
        #[cfg(not(unix))]
        let sigterm = std::future::pending::<()>();

        let received = tokio::select! {
            _ = signal::ctrl_c() => "SIGINT",
            _ = sigterm => "SIGTERM",
        };
        tracing::info!(signal = received, "shutting down");
        self.shutdown();
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signalled_completes_after_shutdown() {
        let controller = ShutdownController::new();
        let stopped = controller.signalled();
        controller.shutdown();
        tokio::time::timeout(std::time::Duration::from_secs(1), stopped)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn every_subscriber_hears_the_trigger() {
        let controller = ShutdownController::new();
        let mut server = controller.subscribe();
        let mut worker = controller.subscribe();
        controller.shutdown();
        assert!(server.recv().await.is_ok());
        assert!(worker.recv().await.is_ok());
    }

    #[tokio::test]
    async fn dropping_the_controller_releases_waiters() {
        let controller = ShutdownController::new();
        let stopped = controller.signalled();
        drop(controller);
        tokio::time::timeout(std::time::Duration::from_secs(1), stopped)
            .await
            .unwrap();
    }
}
