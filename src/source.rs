//! Byte-level character source shared by the language scanners.
//!
//! Scanners read one byte at a time and may push a single byte back.
//! The pushed-back byte does not have to be the byte that was read:
//! the Go scanner replaces a whole comment with a synthetic newline or
//! space so that statement termination still sees it.

/// Saved cursor state, restored with [`Source::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pos: usize,
    line: usize,
    pushback: Option<u8>,
}

/// Cursor over raw source bytes with one byte of pushback.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    input: &'a [u8],
    pos: usize,
    line: usize,
    pushback: Option<u8>,
}

impl<'a> Source<'a> {
    /// Create a source positioned at the first byte, skipping a UTF-8
    /// byte order mark. Offsets stay relative to the full input.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        let start = if input.starts_with(&[0xEF, 0xBB, 0xBF]) {
            3
        } else {
            0
        };
        Self {
            input,
            pos: start,
            line: 1,
            pushback: None,
        }
    }

    /// Read the next byte, or `None` at end of input.
    pub fn getc(&mut self) -> Option<u8> {
        if let Some(c) = self.pushback.take() {
            return Some(c);
        }
        let c = self.input.get(self.pos).copied()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Push one byte back so the next [`getc`](Self::getc) returns it.
    ///
    /// Re-reading a pushed-back newline does not advance the line count
    /// a second time.
    pub fn ungetc(&mut self, c: u8) {
        debug_assert!(self.pushback.is_none(), "only one byte of pushback");
        self.pushback = Some(c);
    }

    /// Look at the next byte without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    /// Look `n` bytes ahead without consuming anything.
    #[must_use]
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        match self.pushback {
            Some(c) if n == 0 => Some(c),
            Some(_) => self.input.get(self.pos + n - 1).copied(),
            None => self.input.get(self.pos + n).copied(),
        }
    }

    /// Consume bytes up to and including `target`. Returns `false` if the
    /// input ended first.
    pub fn skip_to(&mut self, target: u8) -> bool {
        while let Some(c) = self.getc() {
            if c == target {
                return true;
            }
        }
        false
    }

    /// Current 1-based line number.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Byte offset of the next byte to be read.
    #[must_use]
    pub const fn offset(&self) -> usize {
        if self.pushback.is_some() {
            self.pos.saturating_sub(1)
        } else {
            self.pos
        }
    }

    #[must_use]
    pub const fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            pushback: self.pushback,
        }
    }

    pub const fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.line = mark.line;
        self.pushback = mark.pushback;
    }
}

/// Maps byte offsets to 1-based line numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new(input: &[u8]) -> Self {
        let mut starts = vec![0];
        starts.extend(
            input
                .iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { starts }
    }

    /// Line containing `offset`. Offsets past the end map to the last line.
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getc_tracks_lines() {
        let mut src = Source::new(b"a\nb");
        assert_eq!(src.getc(), Some(b'a'));
        assert_eq!(src.line(), 1);
        assert_eq!(src.getc(), Some(b'\n'));
        assert_eq!(src.line(), 2);
        assert_eq!(src.getc(), Some(b'b'));
        assert_eq!(src.getc(), None);
    }

    #[test]
    fn pushback_of_newline_does_not_double_count() {
        let mut src = Source::new(b"\nx");
        assert_eq!(src.getc(), Some(b'\n'));
        src.ungetc(b'\n');
        assert_eq!(src.getc(), Some(b'\n'));
        assert_eq!(src.line(), 2);
        assert_eq!(src.getc(), Some(b'x'));
    }

    #[test]
    fn synthetic_pushback() {
        let mut src = Source::new(b"ab");
        assert_eq!(src.getc(), Some(b'a'));
        src.ungetc(b' ');
        assert_eq!(src.peek(), Some(b' '));
        assert_eq!(src.peek_at(1), Some(b'b'));
        assert_eq!(src.getc(), Some(b' '));
        assert_eq!(src.getc(), Some(b'b'));
    }

    #[test]
    fn bom_is_skipped_but_offsets_are_absolute() {
        let src = Source::new("\u{FEFF}x".as_bytes());
        assert_eq!(src.peek(), Some(b'x'));
        assert_eq!(src.offset(), 3);
    }

    #[test]
    fn mark_and_reset() {
        let mut src = Source::new(b"one\ntwo");
        let mark = src.mark();
        src.skip_to(b'\n');
        assert_eq!(src.line(), 2);
        src.reset(mark);
        assert_eq!(src.line(), 1);
        assert_eq!(src.peek(), Some(b'o'));
    }

    #[test]
    fn line_index() {
        let index = LineIndex::new(b"a\nbc\n\nd");
        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(1), 1);
        assert_eq!(index.line_of(2), 2);
        assert_eq!(index.line_of(5), 3);
        assert_eq!(index.line_of(6), 4);
        assert_eq!(index.line_of(100), 4);
    }
}
