use std::time::Duration;

use relaypulse_core::{hardware::TouchProbe, TickEvent};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, warn};

use crate::signal::TripSignal;

/// Poll cadence for sensors fed from a 5 V supply.
pub const FAST_POLL_5V: Duration = Duration::from_millis(250);
/// Poll cadence for sensors fed from 3.3 V; these settle slower.
pub const SLOW_POLL_3V3: Duration = Duration::from_millis(600);

/// Sample `probe` every `every` and report touches as timestamps.
///
/// A reading counts as a touch when it differs from `idle_level`. The
/// channel is a single-slot mailbox: while one touch sits unread, further
/// touches are dropped rather than queued, so a slow consumer sees at most
/// one outstanding event and the poll loop never blocks on it. Read errors
/// are logged and the poll continues; a flaky sensor must not take the
/// process down.
///
/// The loop exits when `stop` trips, closing the channel.
pub fn watch_touch<P>(
    mut probe: P,
    every: Duration,
    idle_level: bool,
    stop: TripSignal,
) -> mpsc::Receiver<TickEvent>
where
    P: TouchProbe + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = time::sleep(every) => {
                    match probe.sample().await {
                        Ok(level) if level != idle_level => {
                            // try_send: mailbox full means a touch is already
                            // pending, and one is all a consumer needs.
                            if tx.try_send(TickEvent::now()).is_ok() {
                                debug!("touch sensed");
                            }
                        }
                        Ok(_) => {}
                        Err(e) => warn!(error = %e, "touch probe read failed"),
                    }
                }
                _ = stop.tripped() => {
                    debug!("touch watch stopping");
                    return;
                }
            }
        }
    });
    rx
}
