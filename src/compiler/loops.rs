//! Loop pre-expansion
//!
//! `[body]n` becomes `body` repeated `n` times (2 when `n` is absent).
//! Nested loops expand inside-out.

use super::cursor::Cursor;
use crate::error::{Error, Result};

/// Upper bound for a single loop's repeat count
pub const MAX_LOOP_COUNT: u32 = 255;

/// Default repeat count for `]` without digits
pub const DEFAULT_LOOP_COUNT: u32 = 2;

/// Largest flattened MML a track may expand to
pub const MAX_EXPANDED_LEN: usize = 1 << 20;

/// Expand every loop construct in `mml`, dropping whitespace
///
/// An unclosed `[` leaves its body in place once; a `]` with no open loop is
/// dropped along with its count. Expansion past [`MAX_EXPANDED_LEN`] bytes is
/// an error.
pub fn expand_loops(mml: &str) -> Result<String> {
    let compact: String = mml.chars().filter(|c| !c.is_whitespace()).collect();
    let mut cursor = Cursor::new(&compact);
    let mut out: Vec<u8> = Vec::with_capacity(compact.len());
    // Output offsets where each open loop body begins
    let mut open: Vec<usize> = Vec::new();

    while let Some(b) = cursor.bump() {
        match b {
            b'[' => open.push(out.len()),
            b']' => {
                let count = cursor
                    .read_number(1, MAX_LOOP_COUNT)
                    .unwrap_or(DEFAULT_LOOP_COUNT);
                match open.pop() {
                    Some(start) => {
                        let body = out[start..].to_vec();
                        let grown = body.len().saturating_mul(count as usize - 1);
                        if out.len().saturating_add(grown) > MAX_EXPANDED_LEN {
                            return Err(Error::LoopTooLong {
                                limit: MAX_EXPANDED_LEN,
                            });
                        }
                        for _ in 1..count {
                            out.extend_from_slice(&body);
                        }
                    }
                    None => tracing::trace!("unmatched ']' dropped"),
                }
            }
            _ => out.push(b),
        }
    }

    if !open.is_empty() {
        tracing::trace!(unclosed = open.len(), "unclosed '[' played once");
    }

    // Only ASCII brackets and digits were removed, so the bytes stay UTF-8
    Ok(String::from_utf8_lossy(&out).into_owned())
}
