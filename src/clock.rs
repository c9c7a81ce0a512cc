mod timing;

pub use timing::*;

use std::{fmt, time::Duration};

use log::{debug, info};
use thiserror::Error;

/// The side of a player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    /// Returns the opposite side.
    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
        }
    }

    /// Returns the ordinal of the side, 0 for `Top` and 1 for `Bottom`.
    pub fn ord(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Bottom => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Side::Top => "Top",
            Side::Bottom => "Bottom",
        }
        .fmt(f)
    }
}

/// The phase of a game.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    /// Configured, waiting for the first tap.
    NotStarted,
    /// A clock is counting down.
    Running,
    /// Stopped by a player; the active side is kept.
    Paused,
    /// A clock reached zero.
    Ended,
}

/// An error rejecting a configuration.
#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum ConfigError {
    #[error("base duration must be positive")]
    ZeroBase,
    #[error("base minutes out of range: {0}")]
    MinutesOutOfRange(u32),
    #[error("increment seconds out of range: {0}")]
    IncrementOutOfRange(u32),
    #[error("a game is in progress, reset it first")]
    GameInProgress,
}

/// The state of a configured game.
#[derive(Debug, Clone)]
struct ClockState {
    remaining: [Duration; 2],
    active: Option<Side>,
    phase: Phase,
    increment: Duration,
    move_count: u32,
}

/// A read-only view of the clock.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Snapshot {
    /// The remaining time of (top, bottom).
    pub remaining: [Duration; 2],
    /// The side whose clock is counting down.
    pub active: Option<Side>,
    /// The phase of the game.
    pub phase: Phase,
    /// The count of completed half-moves.
    pub move_count: u32,
}

impl Snapshot {
    /// Returns the remaining time of a side.
    pub fn remaining(&self, side: Side) -> Duration {
        self.remaining[side.ord()]
    }

    /// Returns the current full-move number.
    pub fn move_number(&self) -> u32 {
        self.move_count / 2 + 1
    }
}

/// Callbacks invoked by a [`Clock`] when its state changes.
///
/// None of them is invoked for an operation that was ignored.
pub trait Observer {
    /// A game was configured.
    fn on_configure(&mut self, _settings: &TimingSettings) {}

    /// A move was completed by `side`.
    fn on_move(&mut self, _side: Side, _move_count: u32) {}

    /// The clock of `side` reached zero.
    fn on_time_expired(&mut self, _side: Side) {}

    /// The game was paused or resumed.
    fn on_pause(&mut self, _paused: bool) {}

    /// The state has changed.
    fn on_update(&mut self, _snapshot: &Snapshot) {}

    /// The game was discarded.
    fn on_reset(&mut self) {}
}

impl Observer for () {}

impl<A: Observer, B: Observer> Observer for (A, B) {
    fn on_configure(&mut self, settings: &TimingSettings) {
        self.0.on_configure(settings);
        self.1.on_configure(settings);
    }

    fn on_move(&mut self, side: Side, move_count: u32) {
        self.0.on_move(side, move_count);
        self.1.on_move(side, move_count);
    }

    fn on_time_expired(&mut self, side: Side) {
        self.0.on_time_expired(side);
        self.1.on_time_expired(side);
    }

    fn on_pause(&mut self, paused: bool) {
        self.0.on_pause(paused);
        self.1.on_pause(paused);
    }

    fn on_update(&mut self, snapshot: &Snapshot) {
        self.0.on_update(snapshot);
        self.1.on_update(snapshot);
    }

    fn on_reset(&mut self) {
        self.0.on_reset();
        self.1.on_reset();
    }
}

/// A dual-player countdown clock.
///
/// Every operation is total: calls that make no sense in the current phase
/// are ignored.
pub struct Clock<O = ()> {
    state: Option<ClockState>,
    observer: O,
}

impl Clock {
    /// Creates an unconfigured clock without an observer.
    pub fn new() -> Clock {
        Clock::with_observer(())
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::new()
    }
}

impl<O: Observer> Clock<O> {
    /// Creates an unconfigured clock reporting to an observer.
    pub fn with_observer(observer: O) -> Clock<O> {
        Clock {
            state: None,
            observer,
        }
    }

    /// Returns the observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Returns the observer mutably.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Returns a snapshot of the state, or `None` if unconfigured.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state.as_ref().map(|s| Snapshot {
            remaining: s.remaining,
            active: s.active,
            phase: s.phase,
            move_count: s.move_count,
        })
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.state.as_ref().map_or(Phase::NotStarted, |s| s.phase)
    }

    /// Returns `true` if the clock has been configured since creation or the last reset.
    pub fn is_configured(&self) -> bool {
        self.state.is_some()
    }

    /// Sets both clocks to the base duration and fixes the increment.
    ///
    /// Rejected, leaving the state unchanged, if the base is zero or a game has started.
    pub fn configure(&mut self, settings: TimingSettings) -> Result<(), ConfigError> {
        if settings.base.is_zero() {
            return Err(ConfigError::ZeroBase);
        }
        if self.phase() != Phase::NotStarted {
            return Err(ConfigError::GameInProgress);
        }
        self.state = Some(ClockState {
            remaining: [settings.base; 2],
            active: None,
            phase: Phase::NotStarted,
            increment: settings.increment,
            move_count: 0,
        });
        info!("clock configured: {}", settings);
        self.observer.on_configure(&settings);
        self.notify_update();
        Ok(())
    }

    /// Ends the turn of `side`, or starts the game on the first tap.
    ///
    /// Returns `true` if the action was accepted.
    pub fn player_action(&mut self, side: Side) -> bool {
        let state = match &mut self.state {
            Some(s) => s,
            None => return false,
        };
        if state.remaining.iter().any(|t| t.is_zero()) {
            return false;
        }
        match state.phase {
            Phase::NotStarted => {
                // The tapping side has just made its first move.
                state.phase = Phase::Running;
                state.active = Some(side.opposite());
                state.move_count = 1;
                info!("game started by {}", side);
            }
            Phase::Running if state.active == Some(side) => {
                let t = &mut state.remaining[side.ord()];
                *t = t.saturating_add(state.increment);
                state.active = Some(side.opposite());
                state.move_count += 1;
                debug!("{} moved, move count: {}", side, state.move_count);
            }
            _ => return false,
        }
        let move_count = state.move_count;
        self.observer.on_move(side, move_count);
        self.notify_update();
        true
    }

    /// Charges `elapsed` to the active side.
    pub fn tick(&mut self, elapsed: Duration) {
        let state = match &mut self.state {
            Some(s) if s.phase == Phase::Running => s,
            _ => return,
        };
        let side = match state.active {
            Some(side) => side,
            None => return,
        };
        let t = &mut state.remaining[side.ord()];
        *t = t.saturating_sub(elapsed);
        let expired = t.is_zero();
        if expired {
            state.phase = Phase::Ended;
            state.active = None;
            info!("time expired for {}", side);
            self.observer.on_time_expired(side);
        }
        self.notify_update();
    }

    /// Pauses a running game or resumes a paused one.
    ///
    /// Returns the new phase, or `None` if ignored.
    pub fn toggle_pause(&mut self) -> Option<Phase> {
        let state = self.state.as_mut()?;
        state.phase = match state.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            _ => return None,
        };
        let phase = state.phase;
        debug!("phase toggled: {:?}", phase);
        self.observer.on_pause(phase == Phase::Paused);
        self.notify_update();
        Some(phase)
    }

    /// Discards the game. A new configuration is required before the next one.
    pub fn reset(&mut self) {
        self.state = None;
        debug!("clock reset");
        self.observer.on_reset();
    }

    fn notify_update(&mut self) {
        if let Some(snapshot) = self.snapshot() {
            self.observer.on_update(&snapshot);
        }
    }
}
