use std::{
    io::{self, Write},
    time::Duration,
};

use log::debug;

use crate::clock::{Observer, Side};

/// A short tone played on a game event.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Cue {
    /// A turn was ended.
    Move,
    /// A clock reached zero.
    TimeUp,
}

impl Cue {
    /// Returns the frequency of the tone in hertz.
    pub fn frequency(self) -> u32 {
        match self {
            Cue::Move => 800,
            Cue::TimeUp => 300,
        }
    }

    /// Returns the length of the tone.
    pub fn duration(self) -> Duration {
        match self {
            Cue::Move => Duration::from_millis(50),
            Cue::TimeUp => Duration::from_millis(600),
        }
    }
}

/// An output able to play tones.
pub trait ToneSink: Send {
    /// Plays a cue.
    fn play(&mut self, cue: Cue) -> io::Result<()>;
}

/// Rings the terminal bell.
#[derive(Debug, Default)]
pub struct Bell;

impl ToneSink for Bell {
    fn play(&mut self, _cue: Cue) -> io::Result<()> {
        let mut err = io::stderr();
        err.write_all(b"\x07")?;
        err.flush()
    }
}

/// A sink that plays nothing.
#[derive(Debug, Default)]
pub struct Silent;

impl ToneSink for Silent {
    fn play(&mut self, _cue: Cue) -> io::Result<()> {
        Ok(())
    }
}

/// Turns clock events into cues.
pub struct Audio {
    muted: bool,
    sink: Box<dyn ToneSink>,
}

impl Audio {
    /// Creates an unmuted adapter playing into a sink.
    pub fn new(sink: Box<dyn ToneSink>) -> Audio {
        Audio { muted: false, sink }
    }

    /// Returns `true` if muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Sets the mute flag.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Flips the mute flag, returning the new value.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    fn cue(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        // Audio is optional, failures are silent.
        if let Err(e) = self.sink.play(cue) {
            debug!("failed to play {:?}: {}", cue, e);
        }
    }
}

impl Observer for Audio {
    fn on_move(&mut self, _side: Side, _move_count: u32) {
        self.cue(Cue::Move);
    }

    fn on_time_expired(&mut self, _side: Side) {
        self.cue(Cue::TimeUp);
    }
}
