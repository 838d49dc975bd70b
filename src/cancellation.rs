//! Process-wide cooperative cancellation: `isCancelled()`, a cancellable
//! `delay(ms)`, and a triggering OS-interrupt signal.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

/// Cheaply cloneable; every clone observes the same underlying signal.
#[derive(Clone)]
pub struct CancellationToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for CancellationToken {
    fn default() -> Self {
        CancellationToken::new()
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        CancellationToken {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Fires the signal. In-flight command executions are left to finish on
    /// their own; this only stops new work from starting.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// A cancellable sleep. Returns `true` if cancellation fired before
    /// `duration` elapsed, `false` if the full duration elapsed first.
    pub async fn delay(&self, duration: Duration) -> bool {
        if self.is_cancelled() {
            return true;
        }
        let mut rx = self.rx.clone();
        tokio::select! {
            _ = tokio::time::sleep(duration) => false,
            result = rx.changed() => result.is_ok(),
        }
    }

    /// Wires SIGINT to this token, the async-runtime counterpart of the
    /// teacher's `ctrlc` dependency.
    pub fn spawn_ctrl_c_listener(&self) {
        let token = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("received interrupt signal, requesting cancellation");
                token.cancel();
            }
        });
    }
}
