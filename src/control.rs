use std::time::Duration;

use log::{debug, info, warn};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    time::{self, MissedTickBehavior},
};

use crate::{
    audio::{Audio, Silent, ToneSink},
    clock::*,
    time_source::{Monotonic, Ticker, TimeSource},
};

/// The cadence at which a running clock is ticked.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// A command sent to the control loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    /// Configures a new game.
    Configure(TimingSettings),
    /// A player tapped their zone.
    Tap(Side),
    /// Pauses or resumes the game.
    TogglePause,
    /// Discards the game.
    Reset,
    /// Flips the mute flag of the audio cues.
    ToggleMute,
}

/// An event of the game.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Event {
    /// A game was configured.
    Configured(TimingSettings),
    /// A configuration was rejected.
    ConfigRejected(ConfigError),
    /// Move made by a side, with the new move count.
    Move(Side, u32),
    /// Time expired for a side.
    TimeExpired(Side),
    /// Game paused.
    Paused,
    /// Game resumed.
    Resumed,
    /// State updated.
    Update(Snapshot),
    /// Game discarded.
    Reset,
    /// Audio muted or unmuted.
    Muted(bool),
}

/// Forwards clock callbacks as events.
pub struct Reporter(UnboundedSender<Event>);

impl Reporter {
    fn send(&self, e: Event) {
        let res = self.0.send(e);
        // Ignore if event receiver is dropped.
        drop(res);
    }
}

impl Observer for Reporter {
    fn on_configure(&mut self, settings: &TimingSettings) {
        self.send(Event::Configured(*settings));
    }

    fn on_move(&mut self, side: Side, move_count: u32) {
        self.send(Event::Move(side, move_count));
    }

    fn on_time_expired(&mut self, side: Side) {
        self.send(Event::TimeExpired(side));
    }

    fn on_pause(&mut self, paused: bool) {
        self.send(if paused { Event::Paused } else { Event::Resumed });
    }

    fn on_update(&mut self, snapshot: &Snapshot) {
        self.send(Event::Update(*snapshot));
    }

    fn on_reset(&mut self) {
        self.send(Event::Reset);
    }
}

/// A command sender for the control loop.
///
/// The loop ends once every sender is dropped.
#[derive(Clone)]
pub struct CommandSender(UnboundedSender<Command>);

impl CommandSender {
    /// Configures a new game.
    pub fn configure(&self, settings: TimingSettings) {
        self.send(Command::Configure(settings))
    }

    /// Taps the zone of a side.
    pub fn tap(&self, side: Side) {
        self.send(Command::Tap(side))
    }

    /// Pauses or resumes the game.
    pub fn toggle_pause(&self) {
        self.send(Command::TogglePause)
    }

    /// Discards the game.
    pub fn reset(&self) {
        self.send(Command::Reset)
    }

    /// Flips the mute flag.
    pub fn toggle_mute(&self) {
        self.send(Command::ToggleMute)
    }

    /// Sends a command.
    pub fn send(&self, cmd: Command) {
        // Ignore if the loop has ended.
        let _ = self.0.send(cmd);
    }
}

/// A builder for a control loop.
pub struct Builder {
    settings: Option<TimingSettings>,
    muted: bool,
    sink: Box<dyn ToneSink>,
}

impl Builder {
    /// Creates a builder with silent audio and no configuration.
    pub fn new() -> Self {
        Builder {
            settings: None,
            muted: false,
            sink: Box::new(Silent),
        }
    }

    /// Configures the first game up front.
    pub fn settings(mut self, settings: TimingSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Sets the sink of audio cues.
    pub fn tone_sink(mut self, sink: impl ToneSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Starts muted.
    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Builds the control loop on the runtime clock.
    pub fn build(self) -> Handle<Monotonic> {
        self.build_with_source(Monotonic::new())
    }

    /// Builds the control loop on a given time source.
    pub fn build_with_source<S: TimeSource>(self, source: S) -> Handle<S> {
        let (cmd_tx, cmd_rx) = unbounded_channel();
        let (event_tx, event_rx) = unbounded_channel();

        let mut audio = Audio::new(self.sink);
        audio.set_muted(self.muted);

        let mut ctrl = Control {
            cmd_rx,
            clock: Clock::with_observer((Reporter(event_tx), audio)),
            ticker: Ticker::new(source),
        };
        if let Some(settings) = self.settings {
            ctrl.configure(settings);
        }

        Handle {
            cmd_tx: CommandSender(cmd_tx),
            event_rx,
            ctrl,
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

/// A handle of a control loop.
pub struct Handle<S> {
    /// A sender of commands.
    pub cmd_tx: CommandSender,
    /// A receiver of game events.
    pub event_rx: UnboundedReceiver<Event>,
    /// The control loop, to be started on a runtime.
    pub ctrl: Control<S>,
}

/// Owns a clock and drives it with commands and ticks.
pub struct Control<S> {
    cmd_rx: UnboundedReceiver<Command>,
    clock: Clock<(Reporter, Audio)>,
    ticker: Ticker<S>,
}

impl<S: TimeSource> Control<S> {
    /// Returns a snapshot of the clock.
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.clock.snapshot()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> Phase {
        self.clock.phase()
    }

    /// Returns `true` if the clock is being ticked.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }

    /// Returns `true` if the audio cues are muted.
    pub fn is_muted(&self) -> bool {
        self.clock.observer().1.is_muted()
    }

    /// Processes a command.
    pub fn handle(&mut self, cmd: Command) {
        debug!("command: {:?}", cmd);
        match cmd {
            Command::Configure(settings) => self.configure(settings),
            Command::Tap(side) => {
                if self.clock.player_action(side) {
                    self.ticker.start();
                    self.ticker.rebaseline();
                }
            }
            Command::TogglePause => match self.clock.toggle_pause() {
                Some(Phase::Paused) => self.ticker.stop(),
                Some(Phase::Running) => self.ticker.start(),
                _ => (),
            },
            Command::Reset => {
                self.ticker.stop();
                self.clock.reset();
            }
            Command::ToggleMute => {
                let (reporter, audio) = self.clock.observer_mut();
                let muted = audio.toggle_mute();
                reporter.send(Event::Muted(muted));
            }
        }
    }

    /// Charges the time since the last tick to the running clock.
    pub fn poll(&mut self) {
        if let Some(delta) = self.ticker.delta() {
            self.clock.tick(delta);
            if self.clock.phase() == Phase::Ended {
                self.ticker.stop();
            }
        }
    }

    fn configure(&mut self, settings: TimingSettings) {
        if let Err(e) = self.clock.configure(settings) {
            warn!("configuration rejected: {}", e);
            self.clock.observer().0.send(Event::ConfigRejected(e));
        }
    }

    /// Runs the loop until every command sender is dropped.
    pub async fn start(mut self) {
        info!("control loop started");
        let mut interval = time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(cmd) => self.handle(cmd),
                    None => break,
                },
                _ = interval.tick() => self.poll(),
            }
        }
        info!("control loop ended");
    }
}
