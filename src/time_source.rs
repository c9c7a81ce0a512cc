use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::time::Instant;

/// A source of monotonic time.
pub trait TimeSource {
    /// Returns the time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// A time source backed by the runtime clock.
///
/// It follows tokio's paused time in tests.
#[derive(Debug, Clone)]
pub struct Monotonic {
    origin: Instant,
}

impl Monotonic {
    /// Creates a time source with its origin at the current instant.
    pub fn new() -> Monotonic {
        Monotonic {
            origin: Instant::now(),
        }
    }
}

impl Default for Monotonic {
    fn default() -> Self {
        Monotonic::new()
    }
}

impl TimeSource for Monotonic {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A time source that only moves when told to.
///
/// Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct Manual {
    millis: Arc<AtomicU64>,
}

impl Manual {
    /// Creates a time source at zero.
    pub fn new() -> Manual {
        Manual::default()
    }

    /// Moves the time forward.
    pub fn advance(&self, by: Duration) {
        let ms = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimeSource for Manual {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

/// Measures the time between ticks while active.
#[derive(Debug)]
pub struct Ticker<S> {
    source: S,
    baseline: Duration,
    active: bool,
}

impl<S: TimeSource> Ticker<S> {
    /// Creates an inactive ticker.
    pub fn new(source: S) -> Ticker<S> {
        Ticker {
            source,
            baseline: Duration::ZERO,
            active: false,
        }
    }

    /// Returns `true` if the ticker is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Activates the ticker, taking the current time as the baseline.
    ///
    /// Does nothing if already active.
    pub fn start(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.rebaseline();
    }

    /// Deactivates the ticker.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Takes the current time as the baseline for the next delta.
    pub fn rebaseline(&mut self) {
        self.baseline = self.source.now();
    }

    /// Returns the time since the baseline and moves the baseline to now,
    /// or `None` if inactive.
    pub fn delta(&mut self) -> Option<Duration> {
        if !self.active {
            return None;
        }
        let now = self.source.now();
        let delta = now.saturating_sub(self.baseline);
        self.baseline = now;
        Some(delta)
    }
}
