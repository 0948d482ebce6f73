//! The source tree node and its public queries.

use std::borrow::Cow;
use std::fmt;

use seam_common::{ContentHash, ContentHasher, Xxh3Hasher};
use seam_config::MapOptions;
use seam_map::{Mapping, RawSourceMap};
use tracing::debug;

use crate::concat::ConcatSource;
use crate::error::SourceError;
use crate::hash::update_tree;
use crate::mapped::{InnerSource, MappedSource};
use crate::normalize::collapse_lines;
use crate::original::OriginalSource;
use crate::raw::RawSource;
use crate::replace::{Edit, ReplaceSource};
use crate::resolve::resolve;

/// A node of a source tree.
///
/// Leaves hold text; [`Concat`](Source::Concat) and
/// [`Replace`](Source::Replace) own their children. Nodes never change after
/// construction, so every query is repeatable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Text with no provenance of its own.
    Raw(RawSource),
    /// An original file, mapped line-for-line onto itself.
    Original(OriginalSource),
    /// Text produced elsewhere, with its wire map.
    Mapped(MappedSource),
    /// Children joined in order.
    Concat(ConcatSource),
    /// One child with edits applied.
    Replace(ReplaceSource),
}

/// The variant of a [`Source`], used as its hash tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// [`Source::Raw`].
    Raw,
    /// [`Source::Original`].
    Original,
    /// [`Source::Mapped`].
    Mapped,
    /// [`Source::Concat`].
    Concat,
    /// [`Source::Replace`].
    Replace,
}

impl SourceKind {
    /// Stable tag fed into content hashes.
    pub fn tag(self) -> &'static str {
        match self {
            SourceKind::Raw => "raw",
            SourceKind::Original => "original",
            SourceKind::Mapped => "mapped",
            SourceKind::Concat => "concat",
            SourceKind::Replace => "replace",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Text and map resolved together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAndMap {
    /// The generated text.
    pub text: String,
    /// The map, `None` when nothing in the tree carries provenance.
    pub map: Option<Mapping>,
}

impl Source {
    /// An anonymous text leaf.
    pub fn raw(text: impl Into<String>) -> Self {
        Source::Raw(RawSource::new(text))
    }

    /// A text leaf that parents trace back to `identity`.
    pub fn raw_named(text: impl Into<String>, identity: impl Into<String>) -> Self {
        Source::Raw(RawSource::named(text, identity))
    }

    /// An original file leaf.
    pub fn original(text: impl Into<String>, identity: impl Into<String>) -> Self {
        Source::Original(OriginalSource::new(text, identity))
    }

    /// A leaf carrying an external wire map.
    pub fn mapped(text: impl Into<String>, identity: impl Into<String>, map: RawSourceMap) -> Self {
        Source::Mapped(MappedSource::new(text, identity, map))
    }

    /// A leaf carrying an external wire map that points into `inner`, whose
    /// own map is composed in.
    pub fn mapped_with_inner(
        text: impl Into<String>,
        identity: impl Into<String>,
        map: RawSourceMap,
        inner: InnerSource,
    ) -> Self {
        Source::Mapped(MappedSource::new(text, identity, map).with_inner(inner))
    }

    /// Concatenates `children`.
    pub fn concat(children: impl IntoIterator<Item = Source>) -> Self {
        Source::Concat(ConcatSource::new(children))
    }

    /// Applies `edits` to `child`.
    pub fn replace(
        child: Source,
        edits: impl IntoIterator<Item = Edit>,
    ) -> Result<Self, SourceError> {
        Ok(Source::Replace(ReplaceSource::new(child, edits)?))
    }

    /// The variant of this node.
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Raw(_) => SourceKind::Raw,
            Source::Original(_) => SourceKind::Original,
            Source::Mapped(_) => SourceKind::Mapped,
            Source::Concat(_) => SourceKind::Concat,
            Source::Replace(_) => SourceKind::Replace,
        }
    }

    /// The generated text. Leaves return their stored text without copying.
    pub fn text(&self) -> Result<Cow<'_, str>, SourceError> {
        match self {
            Source::Raw(leaf) => Ok(Cow::Borrowed(leaf.text())),
            Source::Original(leaf) => Ok(Cow::Borrowed(leaf.text())),
            Source::Mapped(leaf) => Ok(Cow::Borrowed(leaf.text())),
            Source::Concat(_) | Source::Replace(_) => Ok(Cow::Owned(resolve(self, false)?.text)),
        }
    }

    /// The map of the generated text back to its origins.
    pub fn map(&self, options: &MapOptions) -> Result<Option<Mapping>, SourceError> {
        Ok(self.text_and_map(options)?.map)
    }

    /// Text and map from a single resolution.
    pub fn text_and_map(&self, options: &MapOptions) -> Result<TextAndMap, SourceError> {
        let resolved = resolve(self, true)?;
        let map = resolved
            .map
            .map(|map| finish(map, options))
            .transpose()?;
        debug!(
            kind = %self.kind(),
            columns = options.columns,
            segments = map.as_ref().map_or(0, |m| m.segments().len()),
            "resolved source tree"
        );
        Ok(TextAndMap {
            text: resolved.text,
            map,
        })
    }

    /// Feeds this tree's structure into `hasher`.
    pub fn update_hash<H: ContentHasher>(&self, hasher: &mut H) {
        update_tree(self, hasher);
    }

    /// Hashes this tree with [`Xxh3Hasher`].
    pub fn content_hash(&self) -> ContentHash {
        let mut hasher = Xxh3Hasher::new();
        self.update_hash(&mut hasher);
        hasher.finalize()
    }
}

/// Applies top-level options to a resolved map.
fn finish(map: Mapping, options: &MapOptions) -> Result<Mapping, SourceError> {
    let map = if options.columns {
        map
    } else {
        collapse_lines(map)?
    };
    Ok(match &options.file {
        Some(file) => map.with_file(Some(file.clone())),
        None => map,
    })
}

/// Drops subtrees without recursing, so deep trees cannot exhaust the stack.
pub(crate) fn dismantle(mut stack: Vec<Source>) {
    while let Some(mut node) = stack.pop() {
        match &mut node {
            Source::Concat(concat) => stack.append(&mut concat.children),
            Source::Replace(replace) => stack.push(std::mem::replace(
                &mut *replace.child,
                Source::raw(String::new()),
            )),
            _ => {}
        }
    }
}

impl From<RawSource> for Source {
    fn from(leaf: RawSource) -> Self {
        Source::Raw(leaf)
    }
}

impl From<OriginalSource> for Source {
    fn from(leaf: OriginalSource) -> Self {
        Source::Original(leaf)
    }
}

impl From<MappedSource> for Source {
    fn from(leaf: MappedSource) -> Self {
        Source::Mapped(leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seam_map::{Segment, SourceEntry};

    #[test]
    fn leaf_text_is_borrowed() {
        let leaf = Source::original("abc", "a.js");
        assert!(matches!(leaf.text().unwrap(), Cow::Borrowed("abc")));
    }

    #[test]
    fn raw_leaf_has_no_map() {
        let leaf = Source::raw_named("abc", "a.js");
        assert_eq!(leaf.map(&MapOptions::default()).unwrap(), None);
    }

    #[test]
    fn text_and_map_agree_with_separate_calls() {
        let tree = Source::replace(
            Source::concat([Source::original("one\ntwo\n", "a.js"), Source::raw("three")]),
            [Edit::new(4..7, "2")],
        )
        .unwrap();
        let options = MapOptions::default();
        let both = tree.text_and_map(&options).unwrap();
        assert_eq!(both.text, tree.text().unwrap());
        assert_eq!(both.map, tree.map(&options).unwrap());
        assert_eq!(both.text, "one\n2\nthree");
    }

    #[test]
    fn options_file_overrides() {
        let tree = Source::concat([Source::original("x", "x.js")]);
        let map = tree
            .map(&MapOptions::default().with_file("bundle.js"))
            .unwrap()
            .unwrap();
        assert_eq!(map.file(), Some("bundle.js"));
    }

    #[test]
    fn lines_only_collapses() {
        let tree = Source::concat([
            Source::raw("let "),
            Source::original("a = 1;\nb = 2;", "a.js"),
        ]);
        let full = tree.map(&MapOptions::default()).unwrap().unwrap();
        assert_eq!(
            full.segments(),
            &[Segment::traced(1, 4, 0, 1, 0), Segment::traced(2, 0, 0, 2, 0)]
        );
        let lines = tree.map(&MapOptions::lines_only()).unwrap().unwrap();
        assert_eq!(
            lines.segments(),
            &[Segment::traced(1, 0, 0, 1, 0), Segment::traced(2, 0, 0, 2, 0)]
        );
        assert_eq!(
            lines.sources(),
            &[SourceEntry::new("a.js", Some("a = 1;\nb = 2;".to_string()))]
        );
    }

    #[test]
    fn identical_trees_hash_equal() {
        let build = || {
            Source::concat([
                Source::raw("// header\n"),
                Source::original("fn main() {}\n", "main.rs"),
            ])
        };
        let tree = build();
        assert_eq!(tree.content_hash(), tree.content_hash());
        assert_eq!(tree.content_hash(), build().content_hash());
        assert_eq!(tree.content_hash(), tree.clone().content_hash());
        assert_ne!(tree.content_hash(), Source::raw("// header\n").content_hash());
    }
}
