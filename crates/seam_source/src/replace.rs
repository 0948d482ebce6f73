//! Edit nodes: replacements applied to a single child.

use std::ops::Range;

use seam_common::ContentHasher;
use seam_map::{utf16_len, MapError};

use crate::error::SourceError;
use crate::plan::{PlanItem, Resolved};
use crate::source::{dismantle, Source};

/// Replaces `start..end` of a child's text with `replacement`.
///
/// Offsets count UTF-16 code units of the child's resolved text. A zero-length edit is
/// an insertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

impl Edit {
    /// Replaces `range` with `replacement`.
    pub fn new(range: Range<usize>, replacement: impl Into<String>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            replacement: replacement.into(),
        }
    }

    /// Inserts `text` before offset `at`.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at..at, text)
    }

    /// First replaced offset.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last replaced offset.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The replacement text.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// A node applying non-overlapping [`Edit`]s to one child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceSource {
    pub(crate) child: Box<Source>,
    edits: Vec<Edit>,
}

impl ReplaceSource {
    /// Creates the node, sorting edits by position.
    ///
    /// Edits at the same position keep the order they were given in.
    pub fn new(child: Source, edits: impl IntoIterator<Item = Edit>) -> Result<Self, SourceError> {
        let mut edits: Vec<Edit> = edits.into_iter().collect();
        if let Some(edit) = edits.iter().find(|e| e.start > e.end) {
            return Err(SourceError::InvalidEdit {
                start: edit.start,
                end: edit.end,
            });
        }
        edits.sort_by_key(|e| (e.start, e.end));
        if let Some(pair) = edits.windows(2).find(|pair| pair[0].end > pair[1].start) {
            return Err(SourceError::OverlappingReplacement {
                first: (pair[0].start, pair[0].end),
                second: (pair[1].start, pair[1].end),
            });
        }
        Ok(Self {
            child: Box::new(child),
            edits,
        })
    }

    /// The edited child.
    pub fn child(&self) -> &Source {
        &self.child
    }

    /// The edits in application order.
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Copies between edits, a marked insertion per edit.
    pub(crate) fn plan(&self, child: &Resolved) -> Result<Vec<PlanItem>, MapError> {
        let len = utf16_len(&child.text);
        let mut plan = Vec::with_capacity(self.edits.len() * 2 + 1);
        let mut prev = 0;
        for edit in &self.edits {
            if edit.end > len {
                return Err(MapError::OutOfRange {
                    what: "replacement end",
                    value: edit.end,
                    limit: len,
                });
            }
            plan.push(PlanItem::copy(0, prev..edit.start));
            plan.push(PlanItem::marked(edit.replacement.clone()));
            prev = edit.end;
        }
        plan.push(PlanItem::copy(0, prev..len));
        Ok(plan)
    }

    /// Feeds the edits; the child is hashed separately by the tree walk.
    pub(crate) fn update_edits_hash<H: ContentHasher>(&self, hasher: &mut H) {
        hasher.update_u64(self.edits.len() as u64);
        for edit in &self.edits {
            hasher.update_u64(edit.start as u64);
            hasher.update_u64(edit.end as u64);
            hasher.update_str(&edit.replacement);
        }
    }
}

impl Drop for ReplaceSource {
    fn drop(&mut self) {
        dismantle(vec![std::mem::replace(&mut *self.child, Source::raw(String::new()))]);
    }
}
