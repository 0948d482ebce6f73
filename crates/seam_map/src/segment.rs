//! Decoded mapping segments.

use serde::{Deserialize, Serialize};

/// A generated-text position: 1-indexed line, 0-indexed column.
///
/// Ordering is lexicographic by `(line, column)`, which is the total order
/// segments are kept in.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct Position {
    /// The line number (1-indexed).
    pub line: u32,
    /// The column in characters (0-indexed).
    pub column: u32,
}

impl Position {
    /// Creates a position from a 1-indexed line and 0-indexed column.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Where a generated position came from in an original source.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct OriginalLocation {
    /// Index into the mapping's source table.
    pub source: u32,
    /// The original line (1-indexed).
    pub line: u32,
    /// The original column (0-indexed).
    pub column: u32,
    /// Optional index into the mapping's name table.
    pub name: Option<u32>,
}

/// One entry of a mapping: a generated position and, unless the segment is a
/// generated-only marker, the original location it traces back to.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Segment {
    /// The generated line (1-indexed).
    pub generated_line: u32,
    /// The generated column (0-indexed).
    pub generated_column: u32,
    /// The original location, or `None` for a generated-only marker.
    pub original: Option<OriginalLocation>,
}

impl Segment {
    /// Creates a generated-only marker: the position is intentionally unmapped.
    pub fn marker(generated_line: u32, generated_column: u32) -> Self {
        Self {
            generated_line,
            generated_column,
            original: None,
        }
    }

    /// Creates a segment traced to `(source, line, column)` with no name.
    pub fn traced(
        generated_line: u32,
        generated_column: u32,
        source: u32,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            generated_line,
            generated_column,
            original: Some(OriginalLocation {
                source,
                line,
                column,
                name: None,
            }),
        }
    }

    /// Returns the same segment with its original location named `name`.
    ///
    /// Has no effect on a generated-only marker.
    pub fn with_name(mut self, name: u32) -> Self {
        if let Some(original) = self.original.as_mut() {
            original.name = Some(name);
        }
        self
    }

    /// Returns the generated position of this segment.
    pub fn position(&self) -> Position {
        Position::new(self.generated_line, self.generated_column)
    }

    /// Returns `true` if this segment carries no original location.
    pub fn is_marker(&self) -> bool {
        self.original.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_has_no_original() {
        let seg = Segment::marker(2, 5);
        assert!(seg.is_marker());
        assert_eq!(seg.position(), Position::new(2, 5));
    }

    #[test]
    fn with_name_ignored_on_marker() {
        assert_eq!(Segment::marker(1, 0).with_name(3), Segment::marker(1, 0));
        let named = Segment::traced(1, 0, 0, 1, 0).with_name(3);
        assert_eq!(named.original.and_then(|o| o.name), Some(3));
    }

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(1, 40) < Position::new(2, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }
}
