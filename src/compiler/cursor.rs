//! Byte cursor over MML text

/// Forward-only cursor with lookahead helpers that report "no match" at end
/// of input instead of reading past it
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    /// Take the next byte
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Consume `expected` if it is next
    pub fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume bytes up to (not including) `stop`. The flag is false when
    /// `stop` never appears, in which case the rest of the input is taken.
    pub fn take_until(&mut self, stop: u8) -> (&'a [u8], bool) {
        let rest = &self.bytes[self.pos..];
        match rest.iter().position(|&b| b == stop) {
            Some(n) => {
                self.pos += n;
                (&rest[..n], true)
            }
            None => {
                self.pos = self.bytes.len();
                (rest, false)
            }
        }
    }

    /// Read a run of ASCII digits and clamp it into `[min, max]`.
    ///
    /// Returns `(value, consumed)`. With no digits present nothing is
    /// consumed and `(min, 0)` is returned; callers keep their prior value.
    pub fn read_clamped(&mut self, min: u32, max: u32) -> (u32, usize) {
        let start = self.pos;
        let mut value = 0u64;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            value = (value * 10 + (b - b'0') as u64).min(u32::MAX as u64);
            self.pos += 1;
        }
        let consumed = self.pos - start;
        if consumed == 0 {
            return (min, 0);
        }
        ((value as u32).clamp(min, max), consumed)
    }

    /// `read_clamped` that yields `None` when no digits follow
    pub fn read_number(&mut self, min: u32, max: u32) -> Option<u32> {
        match self.read_clamped(min, max) {
            (_, 0) => None,
            (value, _) => Some(value),
        }
    }
}
