use std::{fmt, time::Duration};

use crate::clock::{Phase, Side, Snapshot};

/// Formats a remaining time as `m:ss`, rounding up to the whole second.
///
/// A clock with any time left never shows `0:00`.
pub fn format_time(t: Duration) -> String {
    if t.is_zero() {
        return "0:00".into();
    }
    let ms = t.as_millis();
    let total = (ms + 999) / 1000;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Everything a front end shows for a game.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Face {
    /// The formatted times of (top, bottom).
    pub times: [String; 2],
    /// Whether each side is highlighted as on turn.
    pub active_turn: [bool; 2],
    /// Whether each side has run out of time.
    pub time_up: [bool; 2],
    /// The glyph of the pause button.
    pub pause_glyph: &'static str,
    /// The full-move number.
    pub move_number: u32,
}

impl From<&Snapshot> for Face {
    fn from(s: &Snapshot) -> Face {
        let running = s.phase == Phase::Running;
        let turn = |side: Side| running && s.active == Some(side);
        Face {
            times: [
                format_time(s.remaining(Side::Top)),
                format_time(s.remaining(Side::Bottom)),
            ],
            active_turn: [turn(Side::Top), turn(Side::Bottom)],
            time_up: [
                s.remaining(Side::Top).is_zero(),
                s.remaining(Side::Bottom).is_zero(),
            ],
            pause_glyph: if running { "❚❚" } else { "▶" },
            move_number: s.move_number(),
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |i: usize| {
            if self.time_up[i] {
                '✗'
            } else if self.active_turn[i] {
                '>'
            } else {
                ' '
            }
        };
        write!(
            f,
            "{}Top {:>7} | {}Bottom {:>7} | {} | Move {}",
            mark(0),
            self.times[0],
            mark(1),
            self.times[1],
            self.pause_glyph,
            self.move_number
        )
    }
}
