use std::{fmt, ops::RangeInclusive, time::Duration};

use super::ConfigError;

/// The base minutes a setup may choose from.
pub const MINUTES_RANGE: RangeInclusive<u32> = 1..=120;
/// The increment seconds a setup may choose from.
pub const INCREMENT_RANGE: RangeInclusive<u32> = 0..=60;

/// The timing settings of a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TimingSettings {
    /// The initial time on each clock.
    pub base: Duration,
    /// The time added after each move.
    pub increment: Duration,
}

impl TimingSettings {
    /// Creates settings from a base duration and an increment.
    ///
    /// Fails if the base duration is zero.
    pub fn new(base: Duration, increment: Duration) -> Result<TimingSettings, ConfigError> {
        if base.is_zero() {
            return Err(ConfigError::ZeroBase);
        }
        Ok(TimingSettings { base, increment })
    }

    /// Creates settings from the values picked on a setup screen.
    pub fn from_setup(minutes: u32, increment_secs: u32) -> Result<TimingSettings, ConfigError> {
        if !MINUTES_RANGE.contains(&minutes) {
            return Err(ConfigError::MinutesOutOfRange(minutes));
        }
        if !INCREMENT_RANGE.contains(&increment_secs) {
            return Err(ConfigError::IncrementOutOfRange(increment_secs));
        }
        TimingSettings::new(
            Duration::from_secs(u64::from(minutes) * 60),
            Duration::from_secs(u64::from(increment_secs)),
        )
    }

    /// Returns the preset with the given base minutes and no increment, if any.
    pub fn preset(minutes: u32) -> Option<TimingSettings> {
        PRESETS
            .iter()
            .find(|p| p.minutes == minutes)
            .map(|p| p.settings())
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        TimingSettings {
            base: Duration::from_secs(5 * 60),
            increment: Duration::ZERO,
        }
    }
}

impl fmt::Display for TimingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.base.as_secs();
        if secs % 60 == 0 {
            write!(f, "{}", secs / 60)?;
        } else {
            write!(f, "{}:{:02}", secs / 60, secs % 60)?;
        }
        write!(f, "+{}", self.increment.as_secs())
    }
}

/// A named time control.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Preset {
    /// The name shown to players.
    pub name: &'static str,
    /// The base minutes.
    pub minutes: u32,
}

impl Preset {
    /// Returns the settings of this preset.
    pub fn settings(self) -> TimingSettings {
        TimingSettings {
            base: Duration::from_secs(u64::from(self.minutes) * 60),
            increment: Duration::ZERO,
        }
    }
}

/// The quick-pick presets.
pub const PRESETS: &[Preset] = &[
    Preset { name: "Bullet", minutes: 1 },
    Preset { name: "Blitz", minutes: 3 },
    Preset { name: "Blitz", minutes: 5 },
    Preset { name: "Rapid", minutes: 10 },
    Preset { name: "Classical", minutes: 30 },
];
