use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Relays are electromechanical; cycling them faster than this shortens
/// their life, so shorter intervals and pulse widths are rejected outright.
pub const MIN_GAP_SECS: u64 = 10;

/// Default touch-sensor poll cadence in milliseconds (3.3 V supply rating).
pub const DEFAULT_SENSOR_POLL_MS: u64 = 600;

/// Top-level config (relaypulse.toml + RELAYPULSE_* env overrides).
///
/// Loaded once at process start and then immutable: schedule changes require
/// a restart, which re-derives all timing state from the wall clock anyway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayPulseConfig {
    /// Appliance label used in logs.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    pub schedule: Schedule,
    #[serde(default)]
    pub sensor: SensorConfig,
}

/// When and how the relay is driven.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// Tick once every fixed interval.
    Interval { every_secs: u64 },

    /// Pulse (an on/off pair separated by `width_secs`) every fixed interval.
    IntervalPulse { every_secs: u64, width_secs: u64 },

    /// Tick once a day at the given local wall-clock time (`"HH:MM"`).
    DailyAt { at: String },

    /// Pulse once a day starting at the given local wall-clock time.
    DailyPulseAt { at: String, width_secs: u64 },
}

impl Schedule {
    /// Reject configurations that would mistreat the relay or cannot be
    /// scheduled at all. Runs before any scheduler is constructed, so a bad
    /// schedule never starts ticking.
    pub fn validate(&self) -> Result<()> {
        match self {
            Schedule::Interval { every_secs } => {
                check_interval(*every_secs)?;
            }
            Schedule::IntervalPulse {
                every_secs,
                width_secs,
            } => {
                check_interval(*every_secs)?;
                check_width(*width_secs, *every_secs)?;
            }
            Schedule::DailyAt { at } => {
                check_clock_shape(at)?;
            }
            Schedule::DailyPulseAt { at, width_secs } => {
                check_clock_shape(at)?;
                check_width(*width_secs, 86_400)?;
            }
        }
        Ok(())
    }

    /// The clock string for the daily kinds, `None` for interval kinds.
    pub fn clock(&self) -> Option<&str> {
        match self {
            Schedule::DailyAt { at } | Schedule::DailyPulseAt { at, .. } => Some(at),
            _ => None,
        }
    }
}

fn check_interval(secs: u64) -> Result<()> {
    if secs <= MIN_GAP_SECS {
        return Err(CoreError::IntervalTooShort { secs });
    }
    Ok(())
}

fn check_width(width_secs: u64, interval_secs: u64) -> Result<()> {
    if width_secs <= MIN_GAP_SECS {
        return Err(CoreError::WidthTooShort { secs: width_secs });
    }
    if width_secs >= interval_secs {
        return Err(CoreError::WidthBeyondInterval {
            width_secs,
            interval_secs,
        });
    }
    Ok(())
}

/// Lexical shape check only (`HH:MM`, two digits each side). The scheduler
/// re-parses and range-checks the fields when it is constructed.
fn check_clock_shape(clock: &str) -> Result<()> {
    let b = clock.as_bytes();
    let ok = b.len() == 5
        && b[2] == b':'
        && [0usize, 1, 3, 4]
            .iter()
            .all(|&i| b[i].is_ascii_digit());
    if !ok {
        return Err(CoreError::MalformedClock {
            got: clock.to_string(),
        });
    }
    Ok(())
}

/// Touch-sensor sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Poll cadence in milliseconds.
    #[serde(default = "default_poll_ms")]
    pub poll_ms: u64,
    /// Logic level of an untouched sensor; a reading that differs from this
    /// counts as a touch.
    #[serde(default)]
    pub idle_level: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            poll_ms: default_poll_ms(),
            idle_level: false,
        }
    }
}

impl Default for RelayPulseConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            // Patio lights: one hour starting at 09:05.
            schedule: Schedule::DailyPulseAt {
                at: "09:05".to_string(),
                width_secs: 3_600,
            },
            sensor: SensorConfig::default(),
        }
    }
}

impl RelayPulseConfig {
    /// Load config from a TOML file with RELAYPULSE_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.relaypulse/relaypulse.toml
    ///
    /// The schedule is validated before the config is handed out, so callers
    /// never see a config whose schedule cannot be driven.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: RelayPulseConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("RELAYPULSE_").split("__"))
            .extract()
            .map_err(|e| CoreError::Config(e.to_string()))?;

        config.schedule.validate()?;
        Ok(config)
    }
}

fn default_app_name() -> String {
    "relaypulse".to_string()
}

fn default_poll_ms() -> u64 {
    DEFAULT_SENSOR_POLL_MS
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.relaypulse/relaypulse.toml", home)
}
