//! SMF chunk and event constants

/// Header chunk tag
pub const HEADER_TAG: &[u8; 4] = b"MThd";

/// Track chunk tag
pub const TRACK_TAG: &[u8; 4] = b"MTrk";

/// Header chunk body length
pub const HEADER_LENGTH: u32 = 6;

/// Multi-track, synchronous
pub const FORMAT_1: u16 = 1;

/// Default ticks per quarter note
pub const DEFAULT_DIVISIONS: u16 = 960;

/// Largest ticks-per-quarter value; bit 15 of the field selects SMPTE timing
pub const MAX_DIVISIONS: u16 = 0x7FFF;

/// Default beats per minute
pub const DEFAULT_TEMPO: u32 = 120;

/// Channel voice status bytes (high nibble)
pub mod status {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const POLY_PRESSURE: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;
    pub const SYSEX: u8 = 0xF0;
    pub const SYSEX_ESCAPE: u8 = 0xF7;
    pub const META: u8 = 0xFF;
}

/// Meta event types
pub mod meta {
    pub const SEQUENCE_NAME: u8 = 0x03;
    pub const CHANNEL_PREFIX: u8 = 0x20;
    pub const PORT_PREFIX: u8 = 0x21;
    pub const END_OF_TRACK: u8 = 0x2F;
    pub const TEMPO: u8 = 0x51;
    pub const TIME_SIGNATURE: u8 = 0x58;
}

/// Controller numbers
pub mod cc {
    pub const BANK_SELECT_MSB: u8 = 0x00;
    pub const VOLUME: u8 = 0x07;
    pub const PAN: u8 = 0x0A;
    pub const BANK_SELECT_LSB: u8 = 0x20;
    pub const RESET_ALL_CONTROLLERS: u8 = 0x79;
}

/// Microseconds per quarter note for `bpm`; zero maps to zero
pub fn tempo_micros(bpm: u32) -> u32 {
    if bpm == 0 {
        return 0;
    }
    60_000_000 / bpm
}
