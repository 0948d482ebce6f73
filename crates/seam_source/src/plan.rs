//! Generation plans: how a node assembles its text from its children.

use std::ops::Range;

use seam_map::Mapping;

/// A child's resolved text and provenance, as the composer consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The child's full text.
    pub text: String,
    /// The child's own map, if it carries one.
    pub map: Option<Mapping>,
    /// Declared identity of a map-less child; when set, copying the child
    /// registers it as a source whose content is `text`.
    pub identity: Option<String>,
}

impl Resolved {
    /// A resolution with neither map nor identity.
    pub fn untracked(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            map: None,
            identity: None,
        }
    }
}

/// One step of a generation plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanItem {
    /// Emit the range `range` of child `child`'s text unchanged.
    Copy {
        /// Index of the child in the resolved-children slice.
        child: usize,
        /// UTF-16 offsets into the child's text.
        range: Range<usize>,
    },
    /// Emit literal text with no provenance.
    Insert {
        /// The literal text.
        text: String,
        /// Flag the text as present-but-unmapped with a generated-only
        /// marker; otherwise emit no segment at all.
        marker: bool,
    },
}

impl PlanItem {
    /// A copy of `range` from child `child`.
    pub fn copy(child: usize, range: Range<usize>) -> Self {
        Self::Copy { child, range }
    }

    /// An insertion flagged with a marker.
    pub fn marked(text: impl Into<String>) -> Self {
        Self::Insert {
            text: text.into(),
            marker: true,
        }
    }

    /// A cosmetic insertion with no segment.
    pub fn cosmetic(text: impl Into<String>) -> Self {
        Self::Insert {
            text: text.into(),
            marker: false,
        }
    }
}
