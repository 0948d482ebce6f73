//! Line-start indexing for offset ↔ line/column conversion in UTF-16 units.

use std::ops::Range;

use crate::error::MapError;
use crate::segment::Position;

/// Length of `text` in UTF-16 code units, the unit of every offset and
/// column in this crate.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Precomputed line starts of a text.
///
/// Offsets and columns count UTF-16 code units, as JavaScript string indices
/// and source map consumers do; characters outside the Basic Multilingual
/// Plane take two. Lines are `\n`-delimited; a final line without a
/// terminator still counts, and text ending in `\n` has an empty final line.
/// The index can be grown with [`push_str`](Self::push_str) as text is
/// appended.
#[derive(Debug, Clone)]
pub struct TextIndex {
    /// UTF-16 offset of each line start (the first entry is always 0).
    line_starts: Vec<usize>,
    /// Byte offset of each line start, parallel to `line_starts`.
    byte_starts: Vec<usize>,
    /// Total length in UTF-16 code units.
    len: usize,
    /// Total length in bytes.
    byte_len: usize,
    /// `true` while every indexed char is ASCII, so offsets and bytes agree.
    ascii: bool,
}

impl TextIndex {
    /// Indexes `text`.
    pub fn new(text: &str) -> Self {
        let mut index = Self::empty();
        index.push_str(text);
        index
    }

    /// Creates the index of the empty string.
    pub fn empty() -> Self {
        Self {
            line_starts: vec![0],
            byte_starts: vec![0],
            len: 0,
            byte_len: 0,
            ascii: true,
        }
    }

    /// Extends the index as if `text` were appended to the indexed text.
    pub fn push_str(&mut self, text: &str) {
        if text.is_ascii() {
            for (byte_idx, byte) in text.bytes().enumerate() {
                if byte == b'\n' {
                    self.line_starts.push(self.len + byte_idx + 1);
                    self.byte_starts.push(self.byte_len + byte_idx + 1);
                }
            }
            self.len += text.len();
        } else {
            self.ascii = false;
            for (byte_idx, ch) in text.char_indices() {
                self.len += ch.len_utf16();
                if ch == '\n' {
                    self.line_starts.push(self.len);
                    self.byte_starts.push(self.byte_len + byte_idx + 1);
                }
            }
        }
        self.byte_len += text.len();
    }

    /// Returns the length of the indexed text in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the indexed text is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of lines (at least 1).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the position just past the last char.
    pub fn end_position(&self) -> Position {
        let last = self.line_starts.len() - 1;
        Position::new(
            self.line_starts.len() as u32,
            (self.len - self.line_starts[last]) as u32,
        )
    }

    /// Converts an offset into a 1-indexed line and 0-indexed column.
    ///
    /// `offset == len()` is accepted and yields the end position.
    pub fn line_column_of(&self, offset: usize) -> Result<Position, MapError> {
        self.check_offset(offset)?;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Ok(Position::new(
            line_idx as u32 + 1,
            (offset - self.line_starts[line_idx]) as u32,
        ))
    }

    /// Converts a 1-indexed line and 0-indexed column into an offset.
    ///
    /// The column may equal the line length (the position of the line's
    /// terminator, or the end of the text on the last line).
    pub fn offset_of(&self, line: u32, column: u32) -> Result<usize, MapError> {
        let length = self.line_length(line)?;
        if column as usize > length {
            return Err(MapError::OutOfRange {
                what: "column",
                value: column as usize,
                limit: length,
            });
        }
        Ok(self.line_starts[line as usize - 1] + column as usize)
    }

    /// Returns the length of a 1-indexed line, excluding its `\n`.
    pub fn line_length(&self, line: u32) -> Result<usize, MapError> {
        let idx = self.line_idx(line)?;
        let end = match self.line_starts.get(idx + 1) {
            Some(next) => next - 1,
            None => self.len,
        };
        Ok(end - self.line_starts[idx])
    }

    /// Converts an offset into a byte offset into the indexed text.
    ///
    /// `text` must be the string this index was built from. An offset that
    /// falls between the two halves of a surrogate pair is clamped to the
    /// start of that char.
    pub fn byte_offset(&self, text: &str, offset: usize) -> Result<usize, MapError> {
        self.check_offset(offset)?;
        if self.ascii {
            return Ok(offset);
        }
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => return Ok(self.byte_starts[idx]),
            Err(idx) => idx - 1,
        };
        let line_byte = self.byte_starts[line_idx];
        let skip = offset - self.line_starts[line_idx];
        let mut units = 0;
        for (byte_idx, ch) in text[line_byte..].char_indices() {
            if units + ch.len_utf16() > skip {
                return Ok(line_byte + byte_idx);
            }
            units += ch.len_utf16();
        }
        Ok(self.byte_len)
    }

    /// Returns the sub-slice of `text` covering the offset range `range`.
    pub fn slice<'t>(&self, text: &'t str, range: Range<usize>) -> Result<&'t str, MapError> {
        if range.start > range.end {
            return Err(MapError::OutOfRange {
                what: "offset",
                value: range.start,
                limit: range.end,
            });
        }
        let start = self.byte_offset(text, range.start)?;
        let end = self.byte_offset(text, range.end)?;
        Ok(&text[start..end])
    }

    fn check_offset(&self, offset: usize) -> Result<(), MapError> {
        if offset > self.len {
            return Err(MapError::OutOfRange {
                what: "offset",
                value: offset,
                limit: self.len,
            });
        }
        Ok(())
    }

    fn line_idx(&self, line: u32) -> Result<usize, MapError> {
        let count = self.line_starts.len();
        if line == 0 || line as usize > count {
            return Err(MapError::OutOfRange {
                what: "line",
                value: line as usize,
                limit: count,
            });
        }
        Ok(line as usize - 1)
    }
}

impl Default for TextIndex {
    fn default() -> Self {
        Self::empty()
    }
}
