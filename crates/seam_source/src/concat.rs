//! Concatenation nodes.

use seam_map::utf16_len;

use crate::plan::{PlanItem, Resolved};
use crate::source::{dismantle, Source};

/// A node whose text is its children's texts joined in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConcatSource {
    pub(crate) children: Vec<Source>,
}

impl ConcatSource {
    /// Creates a concatenation of `children`.
    ///
    /// Runs of adjacent anonymous [`RawSource`](crate::RawSource) children are merged into a
    /// single leaf, which never changes the resolved map.
    pub fn new(children: impl IntoIterator<Item = Source>) -> Self {
        let mut node = Self::default();
        for child in children {
            node.push(child);
        }
        node
    }

    /// Appends a child.
    pub fn push(&mut self, child: Source) {
        if let (Some(Source::Raw(last)), Source::Raw(next)) = (self.children.last_mut(), &child) {
            if last.is_anonymous() && next.is_anonymous() {
                last.text.push_str(next.text());
                return;
            }
        }
        self.children.push(child);
    }

    /// The children after merging.
    pub fn children(&self) -> &[Source] {
        &self.children
    }

    /// One whole-text copy per resolved child.
    pub(crate) fn plan(resolved: &[Resolved]) -> Vec<PlanItem> {
        resolved
            .iter()
            .enumerate()
            .map(|(i, child)| PlanItem::copy(i, 0..utf16_len(&child.text)))
            .collect()
    }
}

impl Drop for ConcatSource {
    fn drop(&mut self) {
        dismantle(std::mem::take(&mut self.children));
    }
}
