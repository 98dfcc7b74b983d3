//! Shutdown coordination.

use tokio::sync::broadcast;

/// Fan-out handle for the shutdown signal.
///
/// The server and any background task hold a receiver; firing [`trigger`]
/// once makes every receiver resolve. Dropping the `Shutdown` has the same
/// effect, since receivers see the channel close.
///
/// [`trigger`]: Shutdown::trigger
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
