use chrono::{DateTime, Duration, Local, Timelike};

use crate::error::{Result, SchedulerError};

/// A time-of-day target with minute resolution, parsed from `"HH:MM"`.
///
/// Relay operations are never planned to the second, so the format carries
/// no seconds field. Immutable once parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSpec {
    hour: u32,
    minute: u32,
}

impl ClockSpec {
    /// Parse a 24-hour clock string such as `"20:35"`.
    ///
    /// The input must split into exactly two numeric fields on a single
    /// `:`; hour and minute must fit the 24-hour clock. Anything else is
    /// rejected here, before any scheduling starts.
    pub fn parse(clock: &str) -> Result<Self> {
        let malformed = || SchedulerError::MalformedClock {
            got: clock.to_string(),
        };

        let (hr, min) = clock.split_once(':').ok_or_else(malformed)?;
        if min.contains(':') {
            return Err(malformed());
        }
        let hour: u32 = hr.parse().map_err(|_| malformed())?;
        let minute: u32 = min.parse().map_err(|_| malformed())?;
        if hour > 23 || minute > 59 {
            return Err(SchedulerError::ClockOutOfRange { hour, minute });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Seconds between midnight and this clock time.
    pub fn seconds_from_midnight(&self) -> i64 {
        i64::from(self.hour) * 3_600 + i64::from(self.minute) * 60
    }
}

impl std::fmt::Display for ClockSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Today's occurrence of `spec` and its signed distance from `now`.
///
/// Both instants are compared against the same midnight, so the offset is
/// positive while the target is still ahead today, negative once it has
/// passed, and always within ±24 h. Pure in `now` — callers must evaluate
/// it at the moment a scheduling decision is made, not earlier; an offset
/// cached at construction time goes stale by however long construction and
/// task startup drift apart.
pub fn clock_offset(spec: ClockSpec, now: DateTime<Local>) -> (DateTime<Local>, Duration) {
    let since_midnight = i64::from(now.num_seconds_from_midnight());
    let target =
        now - Duration::seconds(since_midnight) + Duration::seconds(spec.seconds_from_midnight());
    (target, target - now)
}
