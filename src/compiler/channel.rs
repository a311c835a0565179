//! Channel state management

use crate::error::{Error, Result};

/// Default octave (o4 c = MIDI note 60)
pub const DEFAULT_OCTAVE: i32 = 4;

/// Default note-on velocity
pub const DEFAULT_VELOCITY: u8 = 100;

/// Default length denominator (eighth note)
pub const DEFAULT_LENGTH: u32 = 8;

/// Interpreter state for one track; created fresh per compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelState {
    /// Current octave (`>`/`<` may move it outside 1..=8)
    pub octave: i32,
    /// Note-on velocity, 0-127
    pub velocity: u8,
    /// Default note length in ticks
    pub default_length: u32,
    /// MIDI channel, 0-15
    pub channel: u8,
}

impl ChannelState {
    pub fn new(divisions: u32, channel: u8) -> Result<Self> {
        Ok(Self {
            octave: DEFAULT_OCTAVE,
            velocity: DEFAULT_VELOCITY,
            default_length: len_to_tick(divisions, DEFAULT_LENGTH)?,
            channel: channel & 0x0F,
        })
    }
}

/// Convert a length denominator (4 = quarter, 8 = eighth, ...) to ticks
pub fn len_to_tick(divisions: u32, length: u32) -> Result<u32> {
    if divisions == 0 {
        return Err(Error::ZeroDivisions);
    }
    Ok(divisions * 4 / length.max(1))
}

/// Apply `dots` augmentation dots to `ticks`; each dot adds half the
/// previous addition, so one dot is x1.5
pub fn apply_dots(ticks: u32, dots: u32) -> u32 {
    let mut total = ticks;
    let mut part = ticks;
    for _ in 0..dots {
        part /= 2;
        total += part;
    }
    total
}
