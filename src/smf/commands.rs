//! Decoded SMF track events

use serde::Serialize;

/// A decoded track event (delta-time is carried separately)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SmfEvent {
    NoteOff { channel: u8, key: u8, velocity: u8 },
    NoteOn { channel: u8, key: u8, velocity: u8 },
    PolyPressure { channel: u8, key: u8, pressure: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    ProgramChange { channel: u8, program: u8 },
    ChannelPressure { channel: u8, pressure: u8 },
    PitchBend { channel: u8, value: u16 },
    SysEx { data: Vec<u8> },
    SequenceName { text: String },
    ChannelPrefix { channel: u8 },
    PortPrefix { port: u8 },
    /// Microseconds per quarter note
    Tempo { micros: u32 },
    TimeSignature {
        numerator: u8,
        denominator_pow2: u8,
        clocks_per_click: u8,
        thirty_seconds_per_quarter: u8,
    },
    EndOfTrack,
    /// Any other meta event
    Meta { kind: u8, data: Vec<u8> },
}

/// An event paired with its delta-time in ticks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimedEvent {
    pub delta: u32,
    #[serde(flatten)]
    pub event: SmfEvent,
}

/// Number of data bytes following a channel voice status byte
pub fn data_len(status: u8) -> usize {
    match status & 0xF0 {
        0xC0 | 0xD0 => 1,
        _ => 2,
    }
}

impl SmfEvent {
    /// Whether this is a note-on that actually sounds (velocity > 0)
    pub fn is_sounding_note_on(&self) -> bool {
        matches!(self, SmfEvent::NoteOn { velocity, .. } if *velocity > 0)
    }
}
