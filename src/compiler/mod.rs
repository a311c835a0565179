//! MML compiler - turns tracks of MML into SMF track chunks
//!
//! Each track is compiled on its own: loops are expanded first, then the flat
//! text is interpreted left to right against a fresh [`ChannelState`].

pub mod channel;
pub mod cursor;
pub mod event;
pub mod loops;
pub mod note;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::smf::header::cc;
use crate::smf::writer::{track_chunk, SmfWriter};
use channel::{apply_dots, len_to_tick, ChannelState};
use cursor::Cursor;
use event::{Event, EventList};
use note::{chord_notes, note_number, read_accidentals, semitone};

/// Number of MIDI channels
pub const MAX_CHANNELS: usize = 16;

/// Highest port number a port-prefix meta event can carry
pub const MAX_PORT: usize = 127;

/// Channel volume set at the start of every track (CC#7)
pub const DEFAULT_VOLUME: u8 = 100;

/// Operator value ranges
pub mod range {
    pub const OCTAVE: (u32, u32) = (1, 8);
    pub const PROGRAM: (u32, u32) = (1, 128);
    pub const PAN: (u32, u32) = (0, 127);
    pub const TEMPO: (u32, u32) = (1, 960);
    pub const VELOCITY: (u32, u32) = (0, 127);
    pub const CHANNEL: (u32, u32) = (1, 16);
}

/// Compiler bound to one time resolution
#[derive(Debug, Clone, Copy)]
pub struct Compiler {
    divisions: u32,
}

impl Compiler {
    /// Create a compiler for `divisions` ticks per quarter note
    pub fn new(divisions: u16) -> Result<Self> {
        if divisions == 0 {
            return Err(Error::ZeroDivisions);
        }
        Ok(Self {
            divisions: divisions as u32,
        })
    }

    pub fn divisions(&self) -> u16 {
        self.divisions as u16
    }

    /// Compile every track of `document` and assemble the SMF byte stream
    ///
    /// Each track's finished chunk is also stored in its `smf` field.
    pub fn compile(&self, document: &mut Document) -> Result<Vec<u8>> {
        let conductor = self.conductor_chunk(&document.title, document.tempo)?;

        for (index, track) in document.tracks.iter_mut().enumerate() {
            track.smf = self.track_chunk(&track.mml(), index)?;
            tracing::debug!(
                track = %track.name,
                index,
                bytes = track.smf.len(),
                "compiled track"
            );
        }

        let mut writer = SmfWriter::new();
        writer.write_header(document.tracks.len() + 1, self.divisions())?;
        writer.write_chunk(&conductor);
        for track in &document.tracks {
            writer.write_chunk(&track.smf);
        }
        tracing::debug!(tracks = writer.tracks_written(), "assembled SMF");

        Ok(writer.finish())
    }

    /// Conductor track: title, tempo, 4/4 time signature
    pub fn conductor_chunk(&self, title: &str, tempo: u32) -> Result<Vec<u8>> {
        let mut events = EventList::new();
        events.push(Event::sequence_name(title));
        events.push(Event::tempo(0, tempo));
        events.push(Event::time_signature_4_4());
        events.push(Event::end_of_track(0));
        track_chunk(&events.encode()?)
    }

    /// Complete `MTrk` chunk for the track at position `index`
    pub fn track_chunk(&self, mml: &str, index: usize) -> Result<Vec<u8>> {
        let channel = (index % MAX_CHANNELS) as u8;

        let mut events = EventList::new();
        events.push(Event::sequence_name(""));
        events.push(Event::channel_prefix(channel));
        events.push(Event::port_prefix(index.min(MAX_PORT) as u8));
        // Reset and volume always go out on channel 0
        events.push(Event::reset_controllers(0));
        events.push(Event::control_change(0, 0, cc::VOLUME, DEFAULT_VOLUME));
        events.extend(self.compile_events(mml, channel)?);
        events.push(Event::end_of_track(0));

        track_chunk(&events.encode()?)
    }

    /// Encoded event bytes for `mml` without any chunk framing
    pub fn compile_track(&self, mml: &str, channel: u8) -> Result<Vec<u8>> {
        self.compile_events(mml, channel)?.encode()
    }

    /// Interpret `mml` into events, starting on `channel`
    pub fn compile_events(&self, mml: &str, channel: u8) -> Result<EventList> {
        let text = loops::expand_loops(mml)?
            .to_ascii_lowercase()
            .replace('#', "+");
        let mut cursor = Cursor::new(&text);
        let mut state = ChannelState::new(self.divisions, channel)?;
        let mut events = EventList::new();

        while let Some(b) = cursor.bump() {
            match b {
                b'a'..=b'g' => {
                    let offset = semitone(b).unwrap_or_default() + read_accidentals(&mut cursor);
                    let ticks = self.read_duration(&mut cursor, &state)?;
                    let key = note_number(state.octave, offset);
                    push_notes(&mut events, &state, &[key], ticks);
                }
                b'r' => {
                    read_accidentals(&mut cursor);
                    let ticks = self.read_duration(&mut cursor, &state)?;
                    push_rest(&mut events, &state, ticks);
                }
                b'{' => {
                    let (body, closed) = cursor.take_until(b'}');
                    let notes = chord_notes(body, state.octave);
                    let ticks = if closed {
                        cursor.eat(b'}');
                        self.read_duration(&mut cursor, &state)?
                    } else {
                        tracing::trace!("unclosed chord runs to end of track");
                        state.default_length
                    };
                    if notes.is_empty() {
                        push_rest(&mut events, &state, ticks);
                    } else {
                        push_notes(&mut events, &state, &notes, ticks);
                    }
                }
                b'o' => {
                    let (min, max) = range::OCTAVE;
                    if let Some(octave) = cursor.read_number(min, max) {
                        state.octave = octave as i32;
                    }
                }
                b'>' => state.octave += 1,
                b'<' => state.octave -= 1,
                b'l' => {
                    if let Some(length) = cursor.read_number(1, self.divisions) {
                        state.default_length = len_to_tick(self.divisions, length)?;
                    }
                }
                b'@' => {
                    let (min, max) = range::PROGRAM;
                    if let Some(program) = cursor.read_number(min, max) {
                        let ch = state.channel;
                        events.push(Event::control_change(0, ch, cc::BANK_SELECT_MSB, 0));
                        events.push(Event::control_change(0, ch, cc::BANK_SELECT_LSB, 0));
                        events.push(Event::program_change(0, ch, (program - 1) as u8));
                    }
                }
                b'p' => {
                    let (min, max) = range::PAN;
                    if let Some(pan) = cursor.read_number(min, max) {
                        events.push(Event::control_change(0, state.channel, cc::PAN, pan as u8));
                    }
                }
                b't' => {
                    let (min, max) = range::TEMPO;
                    if let Some(bpm) = cursor.read_number(min, max) {
                        events.push(Event::tempo(0, bpm));
                    }
                }
                b'v' => {
                    let (min, max) = range::VELOCITY;
                    if let Some(velocity) = cursor.read_number(min, max) {
                        state.velocity = velocity as u8;
                    }
                }
                b'$' => {
                    let (min, max) = range::CHANNEL;
                    if let Some(channel) = cursor.read_number(min, max) {
                        state.channel = (channel - 1) as u8;
                    }
                }
                other => tracing::trace!(
                    byte = other,
                    position = cursor.position() - 1,
                    "ignored MML character"
                ),
            }
        }

        Ok(events)
    }

    /// Read `[digits][.]*(^[digits][.]*)*` after a note, rest or chord
    fn read_duration(&self, cursor: &mut Cursor, state: &ChannelState) -> Result<u32> {
        let mut ticks = self.read_length(cursor, state)?;
        while cursor.eat(b'^') {
            ticks = ticks.saturating_add(self.read_length(cursor, state)?);
        }
        Ok(ticks)
    }

    fn read_length(&self, cursor: &mut Cursor, state: &ChannelState) -> Result<u32> {
        let base = match cursor.read_number(1, self.divisions) {
            Some(length) => len_to_tick(self.divisions, length)?,
            None => state.default_length,
        };
        let mut dots = 0;
        while cursor.eat(b'.') {
            dots += 1;
        }
        Ok(apply_dots(base, dots))
    }
}

/// Note-ons at delta 0, then note-offs where only the first carries `ticks`
fn push_notes(events: &mut EventList, state: &ChannelState, keys: &[u8], ticks: u32) {
    for &key in keys {
        events.push(Event::note_on(0, state.channel, key, state.velocity));
    }
    for (i, &key) in keys.iter().enumerate() {
        let delta = if i == 0 { ticks } else { 0 };
        events.push(Event::note_off(delta, state.channel, key));
    }
}

/// A rest is a silent note 0 held for `ticks`
fn push_rest(events: &mut EventList, state: &ChannelState, ticks: u32) {
    events.push(Event::note_on(0, state.channel, 0, 0));
    events.push(Event::note_off(ticks, state.channel, 0));
}
