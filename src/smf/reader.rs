//! SMF file reader and parser

use super::commands::{data_len, SmfEvent, TimedEvent};
use super::header::{meta, status, HEADER_TAG, TRACK_TAG};
use super::vlq::decode_vlq;
use crate::error::{Error, Result};

/// Parsed `MThd` contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmfHeader {
    pub format: u16,
    pub track_count: u16,
    pub divisions: u16,
}

/// SMF byte stream reader
pub struct SmfReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SmfReader<'a> {
    /// Create a new reader from raw SMF data
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Check if we've reached the end of data
    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read a single byte
    pub fn read_u8(&mut self) -> Result<u8> {
        let b = *self
            .data
            .get(self.pos)
            .ok_or_else(|| Error::SmfParse("Unexpected end of data".into()))?;
        self.pos += 1;
        Ok(b)
    }

    /// Read a 16-bit big-endian value
    pub fn read_u16_be(&mut self) -> Result<u16> {
        let hi = self.read_u8()? as u16;
        let lo = self.read_u8()? as u16;
        Ok((hi << 8) | lo)
    }

    /// Read a 32-bit big-endian value
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let hi = self.read_u16_be()? as u32;
        let lo = self.read_u16_be()? as u32;
        Ok((hi << 16) | lo)
    }

    /// Read bytes into a buffer
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| Error::SmfParse("Unexpected end of data".into()))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Validate the `MThd` chunk and parse it
    pub fn parse_header(&mut self) -> Result<SmfHeader> {
        if self.read_bytes(4)? != HEADER_TAG {
            return Err(Error::SmfParse("Invalid SMF magic".into()));
        }
        let length = self.read_u32_be()? as usize;
        if length < 6 {
            return Err(Error::SmfParse(format!("Header chunk too short: {}", length)));
        }
        let header = SmfHeader {
            format: self.read_u16_be()?,
            track_count: self.read_u16_be()?,
            divisions: self.read_u16_be()?,
        };
        // Skip any header extension
        self.read_bytes(length - 6)?;
        Ok(header)
    }

    /// Parse every remaining `MTrk` chunk; unknown chunks are skipped
    pub fn parse_tracks(&mut self) -> Result<Vec<Vec<TimedEvent>>> {
        let mut tracks = Vec::new();
        while !self.is_eof() {
            let tag = self.read_bytes(4)?;
            let length = self.read_u32_be()? as usize;
            let body = self.read_bytes(length)?;
            if tag == TRACK_TAG {
                tracks.push(parse_track_events(body)?);
            }
        }
        Ok(tracks)
    }
}

/// Decode the events of one track body, honouring running status
pub fn parse_track_events(body: &[u8]) -> Result<Vec<TimedEvent>> {
    let mut reader = SmfReader::new(body);
    let mut events = Vec::new();
    let mut running: Option<u8> = None;

    while !reader.is_eof() {
        let (delta, used) = decode_vlq(&body[reader.pos..])
            .ok_or_else(|| Error::SmfParse(format!("Bad delta-time at {}", reader.pos)))?;
        reader.pos += used;

        let mut first = reader.read_u8()?;
        let event = if first == status::META {
            let kind = reader.read_u8()?;
            let data = read_length_prefixed(&mut reader, body)?;
            decode_meta(kind, data)
        } else if first == status::SYSEX || first == status::SYSEX_ESCAPE {
            running = None;
            let data = read_length_prefixed(&mut reader, body)?;
            SmfEvent::SysEx {
                data: data.to_vec(),
            }
        } else {
            let status_byte = if first & 0x80 != 0 {
                if first >= status::SYSEX {
                    return Err(Error::SmfParse(format!(
                        "Unsupported status {:#04X} at {}",
                        first, reader.pos
                    )));
                }
                let status_byte = first;
                running = Some(status_byte);
                first = reader.read_u8()?;
                status_byte
            } else {
                running.ok_or_else(|| {
                    Error::SmfParse(format!("Data byte without status at {}", reader.pos))
                })?
            };
            let second = if data_len(status_byte) == 2 {
                reader.read_u8()?
            } else {
                0
            };
            decode_channel(status_byte, first, second)
        };

        let end = event == SmfEvent::EndOfTrack;
        events.push(TimedEvent { delta, event });
        if end {
            break;
        }
    }

    Ok(events)
}

fn read_length_prefixed<'a>(reader: &mut SmfReader<'a>, body: &'a [u8]) -> Result<&'a [u8]> {
    let (len, used) = decode_vlq(&body[reader.pos..])
        .ok_or_else(|| Error::SmfParse(format!("Bad length at {}", reader.pos)))?;
    reader.pos += used;
    reader.read_bytes(len as usize)
}

fn decode_channel(status_byte: u8, a: u8, b: u8) -> SmfEvent {
    let channel = status_byte & 0x0F;
    match status_byte & 0xF0 {
        status::NOTE_OFF => SmfEvent::NoteOff {
            channel,
            key: a,
            velocity: b,
        },
        status::NOTE_ON => SmfEvent::NoteOn {
            channel,
            key: a,
            velocity: b,
        },
        status::POLY_PRESSURE => SmfEvent::PolyPressure {
            channel,
            key: a,
            pressure: b,
        },
        status::CONTROL_CHANGE => SmfEvent::ControlChange {
            channel,
            controller: a,
            value: b,
        },
        status::PROGRAM_CHANGE => SmfEvent::ProgramChange {
            channel,
            program: a,
        },
        status::CHANNEL_PRESSURE => SmfEvent::ChannelPressure {
            channel,
            pressure: a,
        },
        _ => SmfEvent::PitchBend {
            channel,
            value: (a as u16) | ((b as u16) << 7),
        },
    }
}

fn decode_meta(kind: u8, data: &[u8]) -> SmfEvent {
    match (kind, data) {
        (meta::SEQUENCE_NAME, _) => SmfEvent::SequenceName {
            text: String::from_utf8_lossy(data).into_owned(),
        },
        (meta::CHANNEL_PREFIX, [channel]) => SmfEvent::ChannelPrefix { channel: *channel },
        (meta::PORT_PREFIX, [port]) => SmfEvent::PortPrefix { port: *port },
        (meta::END_OF_TRACK, []) => SmfEvent::EndOfTrack,
        (meta::TEMPO, [a, b, c]) => SmfEvent::Tempo {
            micros: ((*a as u32) << 16) | ((*b as u32) << 8) | *c as u32,
        },
        (meta::TIME_SIGNATURE, [n, d, c, b]) => SmfEvent::TimeSignature {
            numerator: *n,
            denominator_pow2: *d,
            clocks_per_click: *c,
            thirty_seconds_per_quarter: *b,
        },
        _ => SmfEvent::Meta {
            kind,
            data: data.to_vec(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let data = [
            0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x02, 0x01, 0xE0,
        ];
        let header = SmfReader::new(&data).parse_header().unwrap();
        assert_eq!(
            header,
            SmfHeader {
                format: 1,
                track_count: 2,
                divisions: 480
            }
        );
    }

    #[test]
    fn test_bad_magic() {
        let data = *b"RIFF\x00\x00\x00\x06\x00\x01\x00\x01\x03\xC0";
        assert!(SmfReader::new(&data).parse_header().is_err());
    }

    #[test]
    fn test_running_status() {
        let body = [
            0x00, 0x90, 0x3C, 0x64, // note on
            0x60, 0x3C, 0x00, // running status note on, velocity 0
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let events = parse_track_events(&body).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1],
            TimedEvent {
                delta: 0x60,
                event: SmfEvent::NoteOn {
                    channel: 0,
                    key: 0x3C,
                    velocity: 0
                }
            }
        );
        assert_eq!(events[2].event, SmfEvent::EndOfTrack);
    }

    #[test]
    fn test_meta_events() {
        let body = [
            0x00, 0xFF, 0x03, 0x02, b'h', b'i', // name
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // tempo
            0x00, 0xFF, 0x2F, 0x00,
        ];
        let events = parse_track_events(&body).unwrap();
        assert_eq!(
            events[0].event,
            SmfEvent::SequenceName { text: "hi".into() }
        );
        assert_eq!(events[1].event, SmfEvent::Tempo { micros: 500000 });
    }

    #[test]
    fn test_truncated_track() {
        assert!(parse_track_events(&[0x00, 0x90, 0x3C]).is_err());
        assert!(parse_track_events(&[0x00, 0x3C, 0x64]).is_err());
    }
}
