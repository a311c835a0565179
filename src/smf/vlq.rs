//! Variable-length quantity and fixed-width integer encoding

use crate::error::{Error, Result};

/// Largest value a MIDI VLQ can carry (four 7-bit groups)
pub const VLQ_MAX: u32 = 0x0FFF_FFFF;

/// Encode `value` as a MIDI variable-length quantity
///
/// The result is left-padded with zero-payload continuation bytes (`0x80`)
/// up to `min_len` bytes, which decodes to the same value.
pub fn encode_vlq(value: u32, min_len: usize) -> Result<Vec<u8>> {
    if value > VLQ_MAX {
        return Err(Error::VlqOverflow(value));
    }

    let mut groups = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    while groups.len() < min_len.min(4) {
        groups.push(0x80);
    }
    groups.reverse();

    Ok(groups)
}

/// Append a VLQ to `out`
pub fn write_vlq(out: &mut Vec<u8>, value: u32) -> Result<()> {
    out.extend(encode_vlq(value, 1)?);
    Ok(())
}

/// Encode `value` as a big-endian integer exactly `width` bytes wide
pub fn encode_fixed(value: u64, width: usize) -> Result<Vec<u8>> {
    if !(1..=4).contains(&width) || value >> (width * 8) != 0 {
        return Err(Error::FixedWidthOverflow { value, width });
    }
    Ok(value.to_be_bytes()[8 - width..].to_vec())
}

/// Append a fixed-width big-endian integer to `out`
pub fn write_fixed(out: &mut Vec<u8>, value: u64, width: usize) -> Result<()> {
    out.extend(encode_fixed(value, width)?);
    Ok(())
}

/// Decode a VLQ from the front of `data`, returning (value, bytes consumed)
pub fn decode_vlq(data: &[u8]) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for (i, &b) in data.iter().take(4).enumerate() {
        value = (value << 7) | (b & 0x7F) as u32;
        if b & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vlq_single_byte() {
        assert_eq!(encode_vlq(0, 1).unwrap(), vec![0x00]);
        assert_eq!(encode_vlq(127, 1).unwrap(), vec![0x7F]);
    }

    #[test]
    fn test_vlq_multi_byte() {
        assert_eq!(encode_vlq(128, 1).unwrap(), vec![0x81, 0x00]);
        assert_eq!(encode_vlq(480, 1).unwrap(), vec![0x83, 0x60]);
        assert_eq!(encode_vlq(16383, 1).unwrap(), vec![0xFF, 0x7F]);
        assert_eq!(encode_vlq(2097151, 1).unwrap(), vec![0xFF, 0xFF, 0x7F]);
        assert_eq!(encode_vlq(VLQ_MAX, 1).unwrap(), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_vlq_overflow() {
        assert!(matches!(
            encode_vlq(0x1000_0000, 1),
            Err(Error::VlqOverflow(0x1000_0000))
        ));
    }

    #[test]
    fn test_vlq_padding() {
        assert_eq!(encode_vlq(127, 4).unwrap(), vec![0x80, 0x80, 0x80, 0x7F]);
        assert_eq!(encode_vlq(16383, 3).unwrap(), vec![0x80, 0xFF, 0x7F]);
        assert_eq!(decode_vlq(&[0x80, 0x80, 0x80, 0x7F]), Some((127, 4)));
    }

    #[test]
    fn test_decode_vlq() {
        assert_eq!(decode_vlq(&[0x83, 0x60, 0x90]), Some((480, 2)));
        assert_eq!(decode_vlq(&[0x81]), None);
        assert_eq!(decode_vlq(&[0xFF, 0xFF, 0xFF, 0xFF, 0x7F]), None);
    }

    #[test]
    fn test_fixed_width() {
        assert_eq!(encode_fixed(6, 4).unwrap(), vec![0x00, 0x00, 0x00, 0x06]);
        assert_eq!(encode_fixed(960, 2).unwrap(), vec![0x03, 0xC0]);
        assert_eq!(encode_fixed(500000, 3).unwrap(), vec![0x07, 0xA1, 0x20]);
    }

    #[test]
    fn test_fixed_width_overflow() {
        assert!(encode_fixed(0x1_0000, 2).is_err());
        assert!(encode_fixed(1, 0).is_err());
        assert!(encode_fixed(1, 5).is_err());
    }
}
