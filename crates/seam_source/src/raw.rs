//! Plain text leaves.

use seam_common::ContentHasher;

use crate::plan::Resolved;

/// A leaf holding text with no provenance of its own.
///
/// When given an identity, a parent that copies this leaf registers it as a
/// source whose content is the text, so its characters stay traceable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSource {
    pub(crate) text: String,
    identity: Option<String>,
}

impl RawSource {
    /// Creates an anonymous leaf.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            identity: None,
        }
    }

    /// Creates a leaf that parents trace back to `identity`.
    pub fn named(text: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            identity: Some(identity.into()),
        }
    }

    /// The stored text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The declared identity, if any.
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    /// Whether this leaf can be merged into a neighbouring anonymous leaf.
    pub(crate) fn is_anonymous(&self) -> bool {
        self.identity.is_none()
    }

    pub(crate) fn resolve(&self) -> Resolved {
        Resolved {
            text: self.text.clone(),
            map: None,
            identity: self.identity.clone(),
        }
    }

    pub(crate) fn update_hash<H: ContentHasher>(&self, hasher: &mut H) {
        hasher.update_str(&self.text);
        hasher.update_opt_str(self.identity.as_deref());
    }
}
