//! Error types for building and resolving source trees.

use seam_map::MapError;

/// Errors raised while constructing or resolving a [`Source`](crate::Source).
///
/// A failed resolution never yields a partial text or map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Two edits of a replace node cover overlapping ranges.
    #[error("replacement {first:?} overlaps replacement {second:?}")]
    OverlappingReplacement {
        /// The earlier edit's `start..end`.
        first: (usize, usize),
        /// The later edit's `start..end`.
        second: (usize, usize),
    },

    /// An edit ends before it starts.
    #[error("replacement range {start}..{end} ends before it starts")]
    InvalidEdit {
        /// Start offset of the edit.
        start: usize,
        /// End offset of the edit.
        end: usize,
    },

    /// Decoding, indexing, or table merging failed.
    #[error(transparent)]
    Map(#[from] MapError),
}
