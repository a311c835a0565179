//! SMF chunk writer

use super::header::{FORMAT_1, HEADER_LENGTH, HEADER_TAG, TRACK_TAG};
use super::vlq::write_fixed;
use crate::error::{Error, Result};

/// Accumulates an SMF byte stream: one header chunk followed by track chunks
#[derive(Debug, Default)]
pub struct SmfWriter {
    data: Vec<u8>,
    tracks_written: usize,
}

impl SmfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the `MThd` chunk for a format 1 file
    pub fn write_header(&mut self, track_count: usize, divisions: u16) -> Result<()> {
        if divisions == 0 {
            return Err(Error::ZeroDivisions);
        }
        self.data.extend_from_slice(HEADER_TAG);
        write_fixed(&mut self.data, HEADER_LENGTH as u64, 4)?;
        write_fixed(&mut self.data, FORMAT_1 as u64, 2)?;
        write_fixed(&mut self.data, track_count as u64, 2)?;
        write_fixed(&mut self.data, divisions as u64, 2)?;
        Ok(())
    }

    /// Append an already framed `MTrk` chunk
    pub fn write_chunk(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
        self.tracks_written += 1;
    }

    /// Number of track chunks written so far
    pub fn tracks_written(&self) -> usize {
        self.tracks_written
    }

    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}

/// Frame a track body as `MTrk` + 4-byte length + body
pub fn track_chunk(body: &[u8]) -> Result<Vec<u8>> {
    let mut chunk = Vec::with_capacity(body.len() + 8);
    chunk.extend_from_slice(TRACK_TAG);
    write_fixed(&mut chunk, body.len() as u64, 4)?;
    chunk.extend_from_slice(body);
    Ok(chunk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_chunk() {
        let mut writer = SmfWriter::new();
        writer.write_header(3, 960).unwrap();
        assert_eq!(
            writer.finish(),
            vec![
                0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x03, 0x03,
                0xC0,
            ]
        );
    }

    #[test]
    fn test_header_rejects_zero_divisions() {
        let mut writer = SmfWriter::new();
        assert!(matches!(writer.write_header(1, 0), Err(Error::ZeroDivisions)));
    }

    #[test]
    fn test_track_chunk_framing() {
        let chunk = track_chunk(&[0x00, 0xFF, 0x2F, 0x00]).unwrap();
        assert_eq!(
            chunk,
            vec![0x4D, 0x54, 0x72, 0x6B, 0x00, 0x00, 0x00, 0x04, 0x00, 0xFF, 0x2F, 0x00]
        );
    }
}
