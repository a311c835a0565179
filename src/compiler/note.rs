//! Note letters and MIDI note numbers

use super::cursor::Cursor;

/// Highest MIDI note number
pub const MAX_NOTE: i32 = 127;

/// Semitone offset of a note letter within the octave
pub fn semitone(letter: u8) -> Option<i32> {
    match letter {
        b'c' => Some(0),
        b'd' => Some(2),
        b'e' => Some(4),
        b'f' => Some(5),
        b'g' => Some(7),
        b'a' => Some(9),
        b'b' => Some(11),
        _ => None,
    }
}

/// Consume any run of `+`/`-` and return the net semitone shift
pub fn read_accidentals(cursor: &mut Cursor) -> i32 {
    let mut shift = 0;
    loop {
        if cursor.eat(b'+') {
            shift += 1;
        } else if cursor.eat(b'-') {
            shift -= 1;
        } else {
            return shift;
        }
    }
}

/// MIDI note number for `semitone` in `octave`, clamped to 0..=127
pub fn note_number(octave: i32, semitone: i32) -> u8 {
    ((octave + 1) * 12 + semitone).clamp(0, MAX_NOTE) as u8
}

/// Notes of a chord body (the text between `{` and `}`)
///
/// `>`/`<` inside the body shift the octave for the rest of the chord only.
/// Anything that is not a note letter, accidental or octave shift is ignored.
pub fn chord_notes(body: &[u8], octave: i32) -> Vec<u8> {
    let text = String::from_utf8_lossy(body);
    let mut cursor = Cursor::new(&text);
    let mut octave = octave;
    let mut notes = Vec::new();

    while let Some(b) = cursor.bump() {
        match b {
            b'>' => octave += 1,
            b'<' => octave -= 1,
            _ => {
                if let Some(offset) = semitone(b) {
                    let shift = read_accidentals(&mut cursor);
                    notes.push(note_number(octave, offset + shift));
                }
            }
        }
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_numbers() {
        assert_eq!(note_number(4, 0), 60);
        assert_eq!(note_number(4, 9), 69);
        assert_eq!(note_number(3, 11), 59);
        assert_eq!(note_number(-1, 0), 0);
    }

    #[test]
    fn test_note_number_clamped() {
        assert_eq!(note_number(-3, 0), 0);
        assert_eq!(note_number(10, 11), 127);
    }

    #[test]
    fn test_accidentals() {
        let mut cursor = Cursor::new("++-x");
        assert_eq!(read_accidentals(&mut cursor), 1);
        assert_eq!(cursor.peek(), Some(b'x'));
    }

    #[test]
    fn test_chord_notes() {
        assert_eq!(chord_notes(b"ceg", 4), vec![60, 64, 67]);
        assert_eq!(chord_notes(b"c+e>c", 4), vec![61, 64, 72]);
        assert_eq!(chord_notes(b"b<g", 4), vec![71, 55]);
        assert!(chord_notes(b"", 4).is_empty());
    }
}
