//! Periodic keepalive for authenticated primary connections.

use crate::connection::Connection;
use crate::error::ClientError;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Callback invoked with the error of a failed keepalive exchange.
pub type FailureHandler = Arc<dyn Fn(&ClientError) + Send + Sync>;

/// Background task that issues a keepalive command every period.
///
/// Keepalives go through [`Connection::keep_alive`] and therefore take the
/// same exchange lock as caller commands. A failed keepalive is reported and
/// the next tick proceeds as usual.
pub struct KeepaliveScheduler {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    period: Duration,
}

impl KeepaliveScheduler {
    /// Spawns the keepalive task. The first keepalive is sent one period from now.
    pub fn start(
        connection: Weak<Connection>,
        period: Duration,
        on_failure: Option<FailureHandler>,
    ) -> Self {
        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(run(connection, period, stop_rx, on_failure));
        tracing::info!("Keepalive started (period={:?})", period);

        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    /// Stops the task and waits for it to exit.
    ///
    /// A keepalive exchange already in flight runs to completion first.
    pub async fn stop(mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!("Keepalive task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for KeepaliveScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run(
    connection: Weak<Connection>,
    period: Duration,
    mut stop_rx: oneshot::Receiver<()>,
    on_failure: Option<FailureHandler>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            _ = ticker.tick() => {}
        }

        let Some(connection) = connection.upgrade() else {
            break;
        };

        match connection.keep_alive().await {
            Ok(()) => tracing::debug!("Keepalive acknowledged (seq={})", connection.sequence()),
            Err(e) => {
                tracing::warn!("Keepalive failed: {}", e);
                if let Some(handler) = &on_failure {
                    handler(&e);
                }
            }
        }
    }

    tracing::info!("Keepalive stopped");
}
