use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

/// One-shot broadcast shutdown flag.
///
/// Cloning is cheap and every clone refers to the same flag. Once tripped it
/// never resets; the only way back is a process restart, which re-derives
/// all scheduling state from the wall clock anyway.
#[derive(Debug, Clone)]
pub struct Breaker {
    tx: Arc<watch::Sender<bool>>,
}

impl Breaker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the flag. Idempotent: tripping an already-tripped breaker is a
    /// no-op, not an error.
    pub fn trip(&self) {
        let was = self.tx.send_replace(true);
        if !was {
            warn!("breaker tripped, shutting down");
        }
    }

    pub fn is_tripped(&self) -> bool {
        *self.tx.borrow()
    }

    /// A waitable view of the flag. Hand one to every task that must stop on
    /// shutdown.
    pub fn signal(&self) -> TripSignal {
        TripSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for Breaker {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side of a [`Breaker`]. Any number of tasks may wait concurrently;
/// all of them observe the trip exactly once.
#[derive(Debug, Clone)]
pub struct TripSignal {
    rx: watch::Receiver<bool>,
}

impl TripSignal {
    pub fn is_tripped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the breaker has tripped. If the [`Breaker`] itself has
    /// been dropped this resolves too — a vanished breaker must read as a
    /// shutdown, never as a wait that can hang forever.
    pub async fn tripped(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|&tripped| tripped).await;
    }
}
