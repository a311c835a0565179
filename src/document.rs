//! Markdown document parser
//!
//! Recognizes a `---` front-matter block (`Divisions`, `Tempo`, `Title`) and
//! pipe tables whose rows are `| name | mml | mml | ... |`. Everything else in
//! the document is ignored, and nothing here fails: bad values fall back to
//! their defaults and malformed rows are skipped.

use crate::smf::header::{DEFAULT_DIVISIONS, DEFAULT_TEMPO, MAX_DIVISIONS};

/// A named track and its MML fragments in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub name: String,
    pub fragments: Vec<String>,
    /// Finished `MTrk` chunk, filled in by the compiler
    pub smf: Vec<u8>,
}

impl Track {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// The full MML program
    pub fn mml(&self) -> String {
        self.fragments.concat()
    }
}

/// Parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Ticks per quarter note
    pub divisions: u16,
    /// Beats per minute
    pub tempo: u32,
    pub title: String,
    pub tracks: Vec<Track>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            divisions: DEFAULT_DIVISIONS,
            tempo: DEFAULT_TEMPO,
            title: String::new(),
            tracks: Vec::new(),
        }
    }
}

/// Where the line scanner currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Body,
    FrontMatter,
    /// Table header seen; the separator row comes next
    TableSeparator,
    TableRows,
}

impl Document {
    /// Parse raw input bytes (invalid UTF-8 is replaced, not rejected)
    pub fn parse(src: &[u8]) -> Self {
        let text = String::from_utf8_lossy(src);
        let mut document = Self::default();
        let mut region = Region::Body;

        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);

            region = match region {
                Region::Body if line == "---" => Region::FrontMatter,
                Region::Body if line.starts_with('|') => Region::TableSeparator,
                Region::Body => Region::Body,
                Region::FrontMatter if line == "---" => Region::Body,
                Region::FrontMatter => {
                    document.set_front_matter(line);
                    Region::FrontMatter
                }
                _ if line.trim().is_empty() => Region::Body,
                _ if line.starts_with(';') => region,
                Region::TableSeparator => Region::TableRows,
                Region::TableRows => {
                    document.add_row(line);
                    Region::TableRows
                }
            };
        }

        document
    }

    /// Look up a track by name
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    fn set_front_matter(&mut self, line: &str) {
        let Some((key, value)) = line.split_once(':') else {
            return;
        };
        let value = value.trim();
        match key.trim() {
            "Divisions" => {
                self.divisions = value
                    .parse::<u16>()
                    .ok()
                    .filter(|&d| d <= MAX_DIVISIONS)
                    .unwrap_or(DEFAULT_DIVISIONS)
            }
            "Tempo" => self.tempo = value.parse().unwrap_or(DEFAULT_TEMPO),
            "Title" => self.title = value.to_string(),
            other => tracing::trace!(key = other, "ignored front-matter key"),
        }
    }

    fn add_row(&mut self, line: &str) {
        let cells: Vec<&str> = line.split('|').collect();
        if cells.len() < 3 {
            tracing::trace!(line, "skipped short table row");
            return;
        }
        // The cell after the final pipe is never MML
        let cells = &cells[..cells.len() - 1];
        let Some(name_at) = cells.iter().position(|c| !c.trim().is_empty()) else {
            return;
        };
        let name = cells[name_at].trim();
        let fragments = cells[name_at + 1..].iter().map(|c| c.trim().to_string());

        match self.tracks.iter_mut().find(|t| t.name == name) {
            Some(track) => track.fragments.extend(fragments),
            None => {
                let mut track = Track::new(name);
                track.fragments.extend(fragments);
                self.tracks.push(track);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
---
Divisions:960
Tempo:140
Title: Scale: Test
---

# Heading

| Track | MML 1 | MML 2 |
|-------|-------|-------|
| A | @10cdefgab | >cc<bagfedc |
| B | @20efgab | >cdeedc<bagfe |
";

    #[test]
    fn test_front_matter() {
        let doc = Document::parse(SAMPLE.as_bytes());
        assert_eq!(doc.divisions, 960);
        assert_eq!(doc.tempo, 140);
        assert_eq!(doc.title, "Scale: Test");
    }

    #[test]
    fn test_tracks() {
        let doc = Document::parse(SAMPLE.as_bytes());
        assert_eq!(doc.tracks.len(), 2);
        assert_eq!(doc.tracks[0].name, "A");
        assert_eq!(doc.tracks[0].mml(), "@10cdefgab>cc<bagfedc");
        assert_eq!(doc.tracks[1].mml(), "@20efgab>cdeedc<bagfe");
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let doc = Document::parse(b"---\nDivisions:abc\nTempo:fast\n---\n");
        assert_eq!(doc.divisions, 960);
        assert_eq!(doc.tempo, 120);
        assert!(doc.tracks.is_empty());
    }

    #[test]
    fn test_divisions_above_timecode_bit_fall_back() {
        assert_eq!(Document::parse(b"---\nDivisions:32767\n---\n").divisions, 32767);
        assert_eq!(Document::parse(b"---\nDivisions:32768\n---\n").divisions, 960);
        assert_eq!(Document::parse(b"---\nDivisions:65535\n---\n").divisions, 960);
    }

    #[test]
    fn test_unknown_keys_and_shapes_ignored() {
        let doc = Document::parse(b"---\nComposer:me\njust text\nDivisions:480\n---\n");
        assert_eq!(doc.divisions, 480);
        assert_eq!(doc.title, "");
    }

    #[test]
    fn test_merge_across_rows_and_tables() {
        let src = "\
| T | M |
|---|---|
| A | cde |
| B | efg |
| A | fga |

| T | M |
|---|---|
| B | b |
";
        let doc = Document::parse(src.as_bytes());
        assert_eq!(doc.tracks.len(), 2);
        assert_eq!(doc.tracks[0].fragments, vec!["cde", "fga"]);
        assert_eq!(doc.tracks[1].fragments, vec!["efg", "b"]);
    }

    #[test]
    fn test_comments_and_short_rows() {
        let src = "\
| T | M |
|---|---|
; a comment | X | c |
| A
| A | c |
";
        let doc = Document::parse(src.as_bytes());
        assert_eq!(doc.tracks.len(), 1);
        assert_eq!(doc.tracks[0].fragments, vec!["c"]);
    }

    #[test]
    fn test_blank_line_ends_table() {
        let src = "| T | M |\n|---|---|\n| A | c |\n\n| B | d |\n";
        let doc = Document::parse(src.as_bytes());
        // "| B | d |" opens a new table as its header row
        assert_eq!(doc.tracks.len(), 1);
        assert_eq!(doc.track("A").map(Track::mml), Some("c".to_string()));
    }

    #[test]
    fn test_crlf_lines() {
        let doc = Document::parse(b"---\r\nTempo:90\r\n---\r\n| T | M |\r\n|-|-|\r\n| A | c |\r\n");
        assert_eq!(doc.tempo, 90);
        assert_eq!(doc.tracks[0].mml(), "c");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Document::parse(b""), Document::default());
    }
}
