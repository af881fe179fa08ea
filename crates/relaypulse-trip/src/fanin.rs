use relaypulse_core::TickEvent;
use tokio::sync::mpsc;
use tracing::info;

use crate::signal::Breaker;

/// Merge any number of fire-once cancellation sources into `breaker`.
///
/// Each source is a stream of timestamps that produces at most a handful of
/// events and then stays silent; the first event from any of them trips the
/// breaker. A source that never fires costs one parked task, which exits as
/// soon as the breaker trips through some other path — so a silent source
/// can never deadlock shutdown. A source whose channel closes without firing
/// simply retires its listener.
pub fn fan_in<I>(breaker: &Breaker, sources: I)
where
    I: IntoIterator<Item = mpsc::Receiver<TickEvent>>,
{
    for mut source in sources {
        let breaker = breaker.clone();
        let stop = breaker.signal();
        tokio::spawn(async move {
            tokio::select! {
                fired = source.recv() => {
                    if let Some(ev) = fired {
                        info!(at = %ev, "cancellation source fired");
                        breaker.trip();
                    }
                }
                _ = stop.tripped() => {}
            }
        });
    }
}
