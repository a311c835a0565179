//! JSON serialization types for SMF data

use super::commands::TimedEvent;
use super::reader::SmfHeader;
use serde::Serialize;

/// Top-level JSON structure for an SMF file
#[derive(Debug, Clone, Serialize)]
pub struct SmfJson {
    pub format: u16,
    /// Ticks per quarter note
    pub divisions: u16,
    /// Track count declared in the header
    pub track_count: u16,
    pub tracks: Vec<TrackJson>,
}

/// JSON representation of one track chunk
#[derive(Debug, Clone, Serialize)]
pub struct TrackJson {
    /// Sequence name, if the track carries a non-empty one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Sum of all delta-times
    pub length_ticks: u64,
    pub events: Vec<TimedEvent>,
}

impl SmfJson {
    /// Create an SmfJson from a parsed header and decoded tracks
    pub fn new(header: &SmfHeader, tracks: Vec<Vec<TimedEvent>>) -> Self {
        Self {
            format: header.format,
            divisions: header.divisions,
            track_count: header.track_count,
            tracks: tracks.into_iter().map(TrackJson::from).collect(),
        }
    }
}

impl From<Vec<TimedEvent>> for TrackJson {
    fn from(events: Vec<TimedEvent>) -> Self {
        let name = events.iter().find_map(|e| match &e.event {
            super::SmfEvent::SequenceName { text } if !text.is_empty() => Some(text.clone()),
            _ => None,
        });
        Self {
            name,
            length_ticks: events.iter().map(|e| e.delta as u64).sum(),
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smf::SmfEvent;

    #[test]
    fn test_track_length_and_name() {
        let track = TrackJson::from(vec![
            TimedEvent {
                delta: 0,
                event: SmfEvent::SequenceName { text: "Lead".into() },
            },
            TimedEvent {
                delta: 480,
                event: SmfEvent::EndOfTrack,
            },
        ]);
        assert_eq!(track.name.as_deref(), Some("Lead"));
        assert_eq!(track.length_ticks, 480);
    }

    #[test]
    fn test_serialized_shape() {
        let event = TimedEvent {
            delta: 5,
            event: SmfEvent::ProgramChange {
                channel: 1,
                program: 9,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"delta": 5, "event": "program_change", "channel": 1, "program": 9})
        );
    }
}
