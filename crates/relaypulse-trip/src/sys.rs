use relaypulse_core::TickEvent;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::signal::TripSignal;

/// Report OS termination requests (SIGINT/SIGTERM on unix, ctrl-c elsewhere)
/// as timestamps on a single-slot mailbox, in the same shape as every other
/// cancellation source so [`fan_in`](crate::fan_in) can treat them uniformly.
///
/// The watch loop exits when `stop` trips, closing the channel.
pub fn watch_os_signals(stop: TripSignal) -> mpsc::Receiver<TickEvent> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        watch_loop(tx, stop).await;
        debug!("os signal watch stopping");
    });
    rx
}

#[cfg(unix)]
async fn watch_loop(tx: mpsc::Sender<TickEvent>, stop: TripSignal) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = match signal(SignalKind::interrupt()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to register SIGINT handler");
            return;
        }
    };
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to register SIGTERM handler");
            return;
        }
    };

    loop {
        tokio::select! {
            _ = interrupt.recv() => {
                warn!("received SIGINT");
                let _ = tx.try_send(TickEvent::now());
            }
            _ = terminate.recv() => {
                warn!("received SIGTERM");
                let _ = tx.try_send(TickEvent::now());
            }
            _ = stop.tripped() => return,
        }
    }
}

#[cfg(not(unix))]
async fn watch_loop(tx: mpsc::Sender<TickEvent>, stop: TripSignal) {
    loop {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    error!(error = %e, "ctrl-c handler failed");
                    return;
                }
                warn!("received ctrl-c");
                let _ = tx.try_send(TickEvent::now());
            }
            _ = stop.tripped() => return,
        }
    }
}
