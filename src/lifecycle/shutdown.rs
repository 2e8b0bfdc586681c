//! Shutdown coordination for the gateway.

use std::future::Future;

use tokio::sync::broadcast;

/// Broadcast-based shutdown trigger.
///
/// The server (and tests driving it) hold futures from [`Shutdown::notified`];
/// a single [`Shutdown::trigger`] resolves all of them.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Future that resolves once shutdown is triggered or every
    /// coordinator handle is dropped.
    pub fn notified(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    /// Fire the signal. Harmless with no listeners.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of pending `notified` futures.
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
