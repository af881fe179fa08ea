use std::time::Duration;

use chrono::{DateTime, Local};
use relaypulse_core::{types::DAY, TickEvent};
use relaypulse_trip::TripSignal;
use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, info};

use crate::clock::{clock_offset, ClockSpec};
use crate::error::Result;
use crate::sources::{deliver, pulse_every, tick_every};

/// Daily-anchored scheduler: one tick (or one on/off pulse) per day at a
/// fixed wall-clock time, no matter when the process starts.
///
/// On start it reconciles "today" first — replaying the edges the schedule
/// would already have produced, or skipping a pulse whose window has fully
/// elapsed — and only then settles into the steady 24-hour cadence, where
/// drift can no longer accumulate. One implementation covers both modes;
/// `width` is the only difference between them.
pub struct DailyScheduler {
    clock: ClockSpec,
    width: Option<Duration>,
}

impl DailyScheduler {
    /// A single tick per day at `clock`.
    ///
    /// Fails fast on a bad clock string: a scheduler that cannot be built
    /// is never started, and there is nothing to retry — time itself is the
    /// only dependency and it does not fail.
    pub fn single(clock: &str) -> Result<Self> {
        Ok(Self {
            clock: ClockSpec::parse(clock)?,
            width: None,
        })
    }

    /// An on/off pulse of `width` per day starting at `clock`.
    ///
    /// The configuration layer guarantees `width` fits within a day before
    /// this is ever constructed.
    pub fn pulsed(clock: &str, width: Duration) -> Result<Self> {
        Ok(Self {
            clock: ClockSpec::parse(clock)?,
            width: Some(width),
        })
    }

    /// Spawn the schedule and hand back its event stream.
    ///
    /// The stream closes — and stays closed — once `stop` trips; that
    /// closure is the consumer's only termination signal.
    pub fn start(self, stop: TripSignal) -> mpsc::Receiver<TickEvent> {
        // catch-up can owe a pulse two edges back to back, so give the
        // pulse variant one extra slot of slack
        let (tx, rx) = mpsc::channel(if self.width.is_some() { 2 } else { 1 });
        info!(clock = %self.clock, pulsed = self.width.is_some(), "daily schedule starting");
        tokio::spawn(async move {
            // The clock is read here, inside the task, not at start():
            // spawn-to-poll latency is scheduler time that must not be baked
            // into the offset.
            let now = Local::now();
            self.run_from(now, tx, stop).await;
        });
        rx
    }

    pub(crate) async fn run_from(
        self,
        now: DateTime<Local>,
        tx: mpsc::Sender<TickEvent>,
        stop: TripSignal,
    ) {
        if stop.is_tripped() {
            return;
        }

        let (target, offset) = clock_offset(self.clock, now);
        debug!(
            target = %target,
            offset_secs = offset.num_seconds(),
            "anchoring daily schedule"
        );

        for step in bootstrap_steps(offset.num_seconds(), self.width.map(|w| w.as_secs())) {
            match step {
                Step::Sleep(secs) => {
                    tokio::select! {
                        _ = time::sleep(Duration::from_secs(secs)) => {}
                        _ = stop.tripped() => return,
                    }
                }
                Step::Emit => {
                    if !deliver(&tx, &stop, TickEvent::now()).await {
                        return;
                    }
                }
            }
        }

        // Anchored. Every later day follows the plain 24h cadence; forward
        // its events, still racing the trip signal on each send.
        let mut steady = match self.width {
            None => tick_every(DAY, stop.clone()),
            Some(width) => pulse_every(DAY, width, stop.clone()),
        };
        while let Some(ev) = steady.recv().await {
            if !deliver(&tx, &stop, ev).await {
                return;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Sleep(u64),
    Emit,
}

/// The bootstrap plan for today, as a flat list of cancellable waits and
/// emissions. Pure: feed it the signed offset (seconds until today's
/// target, negative once past) and the pulse width, get back what the
/// first cycle owes.
fn bootstrap_steps(offset_secs: i64, width_secs: Option<u64>) -> Vec<Step> {
    // offset is strictly above -86400, so the wrap to tomorrow's target is
    // always a forward wait
    let day_wrap = (86_400 + offset_secs) as u64;

    match width_secs {
        None => {
            if offset_secs >= 0 {
                vec![Step::Sleep(offset_secs as u64), Step::Emit]
            } else {
                // today's tick already passed: replay it, then wait out the
                // remainder of the 24h cycle
                vec![Step::Emit, Step::Sleep(day_wrap), Step::Emit]
            }
        }
        Some(width) => {
            if offset_secs >= 0 {
                vec![
                    Step::Sleep(offset_secs as u64),
                    Step::Emit,
                    Step::Sleep(width),
                    Step::Emit,
                ]
            } else {
                // pulse window: [target, target + width], both possibly past
                let remaining = width as i64 + offset_secs;
                let mut steps = if remaining > 0 {
                    // inside the window right now: replay the missed
                    // on-edge, finish the off-edge on time
                    vec![Step::Emit, Step::Sleep(remaining as u64), Step::Emit]
                } else {
                    // window fully elapsed: a missed pulse is never
                    // partially replayed
                    Vec::new()
                };
                steps.extend([
                    Step::Sleep(day_wrap),
                    Step::Emit,
                    Step::Sleep(width),
                    Step::Emit,
                ]);
                steps
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use relaypulse_trip::Breaker;

    fn at(h: u32, m: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 2, 21, h, m, 0)
            .single()
            .unwrap()
    }

    // -- bootstrap plans ----------------------------------------------------

    #[test]
    fn plan_single_tick_still_ahead() {
        assert_eq!(
            bootstrap_steps(3_600, None),
            vec![Step::Sleep(3_600), Step::Emit]
        );
    }

    #[test]
    fn plan_single_tick_already_passed() {
        // started at 10:00 for a 09:00 tick: replay now, next one 23h out
        assert_eq!(
            bootstrap_steps(-3_600, None),
            vec![Step::Emit, Step::Sleep(82_800), Step::Emit]
        );
    }

    #[test]
    fn plan_zero_offset_counts_as_ahead() {
        assert_eq!(bootstrap_steps(0, None), vec![Step::Sleep(0), Step::Emit]);
    }

    #[test]
    fn plan_pulse_still_ahead() {
        assert_eq!(
            bootstrap_steps(1_800, Some(7_200)),
            vec![
                Step::Sleep(1_800),
                Step::Emit,
                Step::Sleep(7_200),
                Step::Emit,
            ]
        );
    }

    #[test]
    fn plan_pulse_window_still_open() {
        // started 09:30 for a 09:00–11:00 pulse: immediate on-edge, off-edge
        // in 90min, then tomorrow's pair
        assert_eq!(
            bootstrap_steps(-1_800, Some(7_200)),
            vec![
                Step::Emit,
                Step::Sleep(5_400),
                Step::Emit,
                Step::Sleep(84_600),
                Step::Emit,
                Step::Sleep(7_200),
                Step::Emit,
            ]
        );
    }

    #[test]
    fn plan_pulse_window_fully_elapsed() {
        // started 12:00 for a 09:00–10:00 pulse: nothing today, first pair
        // 21h out
        assert_eq!(
            bootstrap_steps(-10_800, Some(3_600)),
            vec![
                Step::Sleep(75_600),
                Step::Emit,
                Step::Sleep(3_600),
                Step::Emit,
            ]
        );
    }

    #[test]
    fn plan_pulse_window_closing_exactly_now_is_fully_elapsed() {
        assert_eq!(
            bootstrap_steps(-3_600, Some(3_600)),
            vec![
                Step::Sleep(82_800),
                Step::Emit,
                Step::Sleep(3_600),
                Step::Emit,
            ]
        );
    }

    // -- live runs under a paused clock -------------------------------------

    fn spawn_from(
        sched: DailyScheduler,
        now: DateTime<Local>,
        stop: TripSignal,
    ) -> mpsc::Receiver<TickEvent> {
        let (tx, rx) = mpsc::channel(2);
        tokio::spawn(sched.run_from(now, tx, stop));
        rx
    }

    #[tokio::test(start_paused = true)]
    async fn missed_tick_replays_then_locks_to_24h() {
        let breaker = Breaker::new();
        let start = time::Instant::now();
        let sched = DailyScheduler::single("09:00").unwrap();
        let mut events = spawn_from(sched, at(10, 0), breaker.signal());

        events.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);

        events.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(82_800));

        // steady state: exactly a day later
        events.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(82_800 + 86_400));

        breaker.trip();
        assert!(events.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn open_pulse_window_finishes_on_time() {
        let breaker = Breaker::new();
        let start = time::Instant::now();
        let sched = DailyScheduler::pulsed("09:00", Duration::from_secs(7_200)).unwrap();
        let mut events = spawn_from(sched, at(9, 30), breaker.signal());

        // replayed on-edge, then the off-edge 90 minutes out
        events.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
        events.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(5_400));

        // tomorrow's pair
        events.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(5_400 + 84_600));
        events.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(5_400 + 84_600 + 7_200));

        breaker.trip();
        assert!(events.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_pulse_window_is_not_replayed() {
        let breaker = Breaker::new();
        let start = time::Instant::now();
        let sched = DailyScheduler::pulsed("09:00", Duration::from_secs(3_600)).unwrap();
        let mut events = spawn_from(sched, at(12, 0), breaker.signal());

        // nothing for today; first pair 21h out, width apart
        events.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(75_600));
        events.recv().await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(75_600 + 3_600));

        breaker.trip();
        assert!(events.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn trip_before_start_emits_nothing() {
        let breaker = Breaker::new();
        breaker.trip();

        // catch-up branch would emit immediately — unless already tripped
        let sched = DailyScheduler::single("09:00").unwrap();
        let mut events = spawn_from(sched, at(10, 0), breaker.signal());
        assert!(events.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn trip_between_pulse_edges_drops_the_off_edge() {
        let breaker = Breaker::new();
        let sched = DailyScheduler::pulsed("09:00", Duration::from_secs(3_600)).unwrap();
        let mut events = spawn_from(sched, at(8, 0), breaker.signal());

        // on-edge fires at 09:00
        events.recv().await.unwrap();
        breaker.trip();
        assert!(
            events.recv().await.is_none(),
            "a cancelled pulse must not complete its off-edge"
        );
    }

    #[test]
    fn malformed_clock_fails_at_construction() {
        assert!(DailyScheduler::single("9 o'clock").is_err());
        assert!(DailyScheduler::pulsed("25:00", Duration::from_secs(60)).is_err());
    }
}
