//! Leaves that are their own original.

use seam_common::ContentHasher;
use seam_map::{MapError, Mapping, Segment, SourceEntry};

use crate::plan::Resolved;

/// A leaf whose text is an original source file.
///
/// Its map traces every non-empty line to the same line of itself, and its
/// source table holds its own text as content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalSource {
    text: String,
    identity: String,
}

impl OriginalSource {
    /// Creates a leaf for the file `identity` with contents `text`.
    pub fn new(text: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            identity: identity.into(),
        }
    }

    /// The stored text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The declared identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Builds the line-identity map.
    pub fn mapping(&self) -> Result<Mapping, MapError> {
        let segments = self
            .text
            .split('\n')
            .enumerate()
            .filter(|(_, line)| !line.is_empty())
            .map(|(idx, _)| {
                let line = idx as u32 + 1;
                Segment::traced(line, 0, 0, line, 0)
            })
            .collect();
        Mapping::from_parts(
            segments,
            vec![SourceEntry::new(self.identity.clone(), Some(self.text.clone()))],
            Vec::new(),
        )
    }

    pub(crate) fn resolve(&self, with_map: bool) -> Result<Resolved, MapError> {
        Ok(Resolved {
            text: self.text.clone(),
            map: with_map.then(|| self.mapping()).transpose()?,
            identity: None,
        })
    }

    pub(crate) fn update_hash<H: ContentHasher>(&self, hasher: &mut H) {
        hasher.update_str(&self.text);
        hasher.update_str(&self.identity);
    }
}
