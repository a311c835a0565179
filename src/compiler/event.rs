//! Event generation and encoding

use crate::error::Result;
use crate::smf::header::{cc, meta, status, tempo_micros};
use crate::smf::vlq::write_vlq;

/// Largest tempo value a 3-byte meta event can carry
const MAX_TEMPO_MICROS: u32 = 0xFF_FFFF;

/// Event data types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventData {
    NoteOn { key: u8, velocity: u8 },
    NoteOff { key: u8 },
    ControlChange { controller: u8, value: u8 },
    ProgramChange { program: u8 },
    /// Meta event (`FF kind len data`)
    Meta { kind: u8, data: Vec<u8> },
}

/// Event with delta-time and channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Ticks since the previous event in the track
    pub delta: u32,
    /// Channel for voice events; ignored for meta events
    pub channel: u8,
    pub data: EventData,
}

impl Event {
    pub fn new(delta: u32, channel: u8, data: EventData) -> Self {
        Self {
            delta,
            channel: channel & 0x0F,
            data,
        }
    }

    pub fn note_on(delta: u32, channel: u8, key: u8, velocity: u8) -> Self {
        Self::new(
            delta,
            channel,
            EventData::NoteOn {
                key: key & 0x7F,
                velocity: velocity & 0x7F,
            },
        )
    }

    pub fn note_off(delta: u32, channel: u8, key: u8) -> Self {
        Self::new(delta, channel, EventData::NoteOff { key: key & 0x7F })
    }

    pub fn control_change(delta: u32, channel: u8, controller: u8, value: u8) -> Self {
        Self::new(
            delta,
            channel,
            EventData::ControlChange {
                controller: controller & 0x7F,
                value: value & 0x7F,
            },
        )
    }

    pub fn program_change(delta: u32, channel: u8, program: u8) -> Self {
        Self::new(
            delta,
            channel,
            EventData::ProgramChange {
                program: program & 0x7F,
            },
        )
    }

    pub fn meta(delta: u32, kind: u8, data: Vec<u8>) -> Self {
        Self::new(delta, 0, EventData::Meta { kind, data })
    }

    pub fn sequence_name(text: &str) -> Self {
        Self::meta(0, meta::SEQUENCE_NAME, text.as_bytes().to_vec())
    }

    pub fn channel_prefix(channel: u8) -> Self {
        Self::meta(0, meta::CHANNEL_PREFIX, vec![channel & 0x0F])
    }

    pub fn port_prefix(port: u8) -> Self {
        Self::meta(0, meta::PORT_PREFIX, vec![port & 0x7F])
    }

    /// Tempo change; the microsecond value saturates at 3 bytes
    pub fn tempo(delta: u32, bpm: u32) -> Self {
        let micros = tempo_micros(bpm).min(MAX_TEMPO_MICROS);
        Self::meta(delta, meta::TEMPO, micros.to_be_bytes()[1..].to_vec())
    }

    /// 4/4, 24 MIDI clocks per click, 8 32nd-notes per quarter
    pub fn time_signature_4_4() -> Self {
        Self::meta(0, meta::TIME_SIGNATURE, vec![0x04, 0x02, 0x18, 0x08])
    }

    pub fn end_of_track(delta: u32) -> Self {
        Self::meta(delta, meta::END_OF_TRACK, Vec::new())
    }

    /// Reset-all-controllers (CC#121)
    pub fn reset_controllers(channel: u8) -> Self {
        Self::control_change(0, channel, cc::RESET_ALL_CONTROLLERS, 0)
    }

    /// Append the encoded event (delta-time included) to `out`
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        write_vlq(out, self.delta)?;
        match &self.data {
            EventData::NoteOn { key, velocity } => {
                out.extend_from_slice(&[status::NOTE_ON | self.channel, *key, *velocity]);
            }
            EventData::NoteOff { key } => {
                out.extend_from_slice(&[status::NOTE_OFF | self.channel, *key, 0]);
            }
            EventData::ControlChange { controller, value } => {
                out.extend_from_slice(&[status::CONTROL_CHANGE | self.channel, *controller, *value]);
            }
            EventData::ProgramChange { program } => {
                out.extend_from_slice(&[status::PROGRAM_CHANGE | self.channel, *program]);
            }
            EventData::Meta { kind, data } => {
                out.extend_from_slice(&[status::META, *kind]);
                write_vlq(out, data.len() as u32)?;
                out.extend_from_slice(data);
            }
        }
        Ok(())
    }
}

/// Events of one track in emission order
#[derive(Debug, Default, Clone)]
pub struct EventList {
    events: Vec<Event>,
}

impl EventList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Encode every event back to back
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for event in &self.events {
            event.encode(&mut out)?;
        }
        Ok(out)
    }
}

impl IntoIterator for EventList {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl Extend<Event> for EventList {
    fn extend<T: IntoIterator<Item = Event>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(event: Event) -> Vec<u8> {
        let mut out = Vec::new();
        event.encode(&mut out).unwrap();
        out
    }

    #[test]
    fn test_note_events() {
        assert_eq!(bytes(Event::note_on(0, 1, 60, 100)), vec![0x00, 0x91, 0x3C, 0x64]);
        assert_eq!(
            bytes(Event::note_off(960, 1, 60)),
            vec![0x87, 0x40, 0x81, 0x3C, 0x00]
        );
    }

    #[test]
    fn test_meta_events() {
        assert_eq!(bytes(Event::sequence_name("")), vec![0x00, 0xFF, 0x03, 0x00]);
        assert_eq!(
            bytes(Event::tempo(0, 120)),
            vec![0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20]
        );
        assert_eq!(
            bytes(Event::time_signature_4_4()),
            vec![0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08]
        );
        assert_eq!(bytes(Event::end_of_track(0)), vec![0x00, 0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn test_tempo_saturates() {
        assert_eq!(
            bytes(Event::tempo(0, 1)),
            vec![0x00, 0xFF, 0x51, 0x03, 0xFF, 0xFF, 0xFF]
        );
        assert_eq!(
            bytes(Event::tempo(0, 0)),
            vec![0x00, 0xFF, 0x51, 0x03, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_event_list() {
        let mut list = EventList::new();
        list.push(Event::program_change(0, 0, 9));
        list.push(Event::control_change(0, 0, cc::PAN, 64));
        assert_eq!(list.len(), 2);
        assert!(!list.is_empty());
        let channels: Vec<u8> = list.iter().map(|e| e.channel).collect();
        assert_eq!(channels, vec![0, 0]);
        assert_eq!(
            list.iter().next(),
            Some(&Event::program_change(0, 0, 9))
        );
        assert_eq!(
            list.encode().unwrap(),
            vec![0x00, 0xC0, 0x09, 0x00, 0xB0, 0x0A, 0x40]
        );
    }
}
