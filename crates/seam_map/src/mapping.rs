//! The decoded, immutable source map.

use seam_common::ContentHasher;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::MapError;
use crate::segment::{Position, Segment};

/// One slot of a mapping's source table.
///
/// `identity` is the entry of the wire `sources` array, `content` the
/// matching entry of `sourcesContent`. An anonymous source (`identity ==
/// None`) is traceable by position but never has content.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Declared identity of the source, usually a file name.
    pub identity: Option<String>,
    /// Full text of the source, if known.
    pub content: Option<String>,
}

impl SourceEntry {
    /// Creates a named source entry.
    pub fn new(identity: impl Into<String>, content: Option<String>) -> Self {
        Self {
            identity: Some(identity.into()),
            content,
        }
    }

    /// Creates the anonymous source entry.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            content: None,
        }
    }
}

/// A decoded source map: ordered segments plus the source and name tables
/// their indices point into.
///
/// A `Mapping` is never mutated after construction; every composition builds
/// a new one. Segments are strictly ordered by generated position.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Mapping {
    file: Option<String>,
    source_root: Option<String>,
    segments: Vec<Segment>,
    sources: Vec<SourceEntry>,
    names: Vec<String>,
}

impl Mapping {
    /// Builds a mapping from its parts, checking segment order.
    ///
    /// Source and name indices are not checked against the tables; the
    /// composer treats dangling indices as untraceable.
    pub fn from_parts(
        segments: Vec<Segment>,
        sources: Vec<SourceEntry>,
        names: Vec<String>,
    ) -> Result<Self, MapError> {
        if let Some(pair) = segments
            .windows(2)
            .find(|pair| pair[0].position() >= pair[1].position())
        {
            return Err(MapError::malformed(format!(
                "segment at {}:{} is not after {}:{}",
                pair[1].generated_line,
                pair[1].generated_column,
                pair[0].generated_line,
                pair[0].generated_column
            )));
        }
        if let Some(seg) = segments.iter().find(|s| s.generated_line == 0) {
            return Err(MapError::malformed(format!(
                "generated line 0 at column {} (lines are 1-indexed)",
                seg.generated_column
            )));
        }
        Ok(Self {
            file: None,
            source_root: None,
            segments,
            sources,
            names,
        })
    }

    /// Returns the same mapping with its `file` field set.
    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file;
        self
    }

    /// Returns the same mapping with its `sourceRoot` field set.
    pub fn with_source_root(mut self, source_root: Option<String>) -> Self {
        self.source_root = source_root;
        self
    }

    /// Joins `sourceRoot` onto every named source and clears it.
    ///
    /// Identities then stand on their own, so tables of maps with different
    /// roots merge without collisions.
    pub fn with_source_root_applied(mut self) -> Self {
        if let Some(root) = self.source_root.take().filter(|root| !root.is_empty()) {
            for identity in self.sources.iter_mut().filter_map(|e| e.identity.as_mut()) {
                *identity = join_source_root(&root, identity);
            }
        }
        self
    }

    /// The generated file name, if any.
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// The pass-through `sourceRoot`, if any.
    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }

    /// All segments in generated order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The source table.
    pub fn sources(&self) -> &[SourceEntry] {
        &self.sources
    }

    /// The name table.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks up a source table entry.
    pub fn source(&self, index: u32) -> Option<&SourceEntry> {
        self.sources.get(index as usize)
    }

    /// Looks up a name table entry.
    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    /// Returns the segments on generated line `line`, in column order.
    pub fn segments_on_line(&self, line: u32) -> &[Segment] {
        let start = self.segments.partition_point(|s| s.generated_line < line);
        let end = self.segments.partition_point(|s| s.generated_line <= line);
        &self.segments[start..end]
    }

    /// Returns the last segment on `line` whose generated column is at or
    /// before `column`.
    pub fn last_segment_before(&self, line: u32, column: u32) -> Option<&Segment> {
        let on_line = self.segments_on_line(line);
        let idx = on_line.partition_point(|s| s.generated_column <= column);
        idx.checked_sub(1).map(|i| &on_line[i])
    }

    /// Returns the index of the first segment at or after `position`.
    pub fn first_index_at(&self, position: Position) -> usize {
        self.segments.partition_point(|s| s.position() < position)
    }

    /// Consumes the mapping and returns its segments, sources, and names.
    pub fn into_parts(self) -> (Vec<Segment>, Vec<SourceEntry>, Vec<String>) {
        (self.segments, self.sources, self.names)
    }

    /// Encodes the segments into a `mappings` string.
    pub fn encode_mappings(&self) -> String {
        codec::encode(&self.segments)
    }

    /// Feeds the encoded segments and both tables into `hasher`.
    pub fn update_hash<H: ContentHasher>(&self, hasher: &mut H) {
        hasher.update_str(&self.encode_mappings());
        hasher.update_u64(self.sources.len() as u64);
        for entry in &self.sources {
            hasher.update_opt_str(entry.identity.as_deref());
            hasher.update_opt_str(entry.content.as_deref());
        }
        hasher.update_u64(self.names.len() as u64);
        for name in &self.names {
            hasher.update_str(name);
        }
    }
}

/// Prefixes `identity` with `root`, with a `/` between unless `root` ends
/// in one.
fn join_source_root(root: &str, identity: &str) -> String {
    if root.ends_with('/') {
        format!("{root}{identity}")
    } else {
        format!("{root}/{identity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seam_common::Xxh3Hasher;

    fn sample() -> Mapping {
        Mapping::from_parts(
            vec![
                Segment::traced(1, 0, 0, 1, 0),
                Segment::marker(1, 5),
                Segment::traced(1, 9, 0, 1, 20).with_name(0),
                Segment::traced(3, 2, 0, 4, 0),
            ],
            vec![SourceEntry::new("a.js", Some("abc".to_string()))],
            vec!["foo".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn segments_on_line_slices() {
        let m = sample();
        assert_eq!(m.segments_on_line(1).len(), 3);
        assert!(m.segments_on_line(2).is_empty());
        assert_eq!(m.segments_on_line(3)[0].generated_column, 2);
    }

    #[test]
    fn last_segment_before_finds_covering() {
        let m = sample();
        assert_eq!(m.last_segment_before(1, 4).unwrap().generated_column, 0);
        assert!(m.last_segment_before(1, 5).unwrap().is_marker());
        assert_eq!(m.last_segment_before(1, 100).unwrap().generated_column, 9);
        assert!(m.last_segment_before(2, 0).is_none());
        assert!(m.last_segment_before(3, 1).is_none());
    }

    #[test]
    fn unordered_segments_rejected() {
        let err = Mapping::from_parts(
            vec![Segment::marker(2, 0), Segment::marker(1, 4)],
            vec![],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, MapError::Malformed { .. }));
    }

    #[test]
    fn duplicate_position_rejected() {
        assert!(Mapping::from_parts(
            vec![Segment::marker(1, 4), Segment::traced(1, 4, 0, 1, 0)],
            vec![],
            vec![],
        )
        .is_err());
    }

    #[test]
    fn lookups_by_index() {
        let m = sample();
        assert_eq!(m.name(0), Some("foo"));
        assert_eq!(m.name(1), None);
        assert_eq!(m.source(0).and_then(|s| s.identity.as_deref()), Some("a.js"));
    }

    #[test]
    fn hash_tracks_content() {
        let digest = |m: &Mapping| {
            let mut h = Xxh3Hasher::new();
            m.update_hash(&mut h);
            h.finalize()
        };
        let a = sample();
        let b = Mapping::from_parts(
            a.segments().to_vec(),
            vec![SourceEntry::new("a.js", None)],
            a.names().to_vec(),
        )
        .unwrap();
        assert_eq!(digest(&a), digest(&a.clone()));
        assert_ne!(digest(&a), digest(&b));
    }

    #[test]
    fn source_root_joined_onto_named_sources() {
        let map = Mapping::from_parts(
            vec![Segment::traced(1, 0, 0, 1, 0)],
            vec![SourceEntry::new("a.js", None), SourceEntry::anonymous()],
            vec![],
        )
        .unwrap();
        let joined = map.clone().with_source_root(Some("/src".into())).with_source_root_applied();
        assert_eq!(joined.source_root(), None);
        assert_eq!(
            joined.sources(),
            &[SourceEntry::new("/src/a.js", None), SourceEntry::anonymous()]
        );
        let slashed = map.clone().with_source_root(Some("lib/".into())).with_source_root_applied();
        assert_eq!(slashed.sources()[0].identity.as_deref(), Some("lib/a.js"));
        let empty = map.clone().with_source_root(Some(String::new())).with_source_root_applied();
        assert_eq!(empty, map);
    }
}
