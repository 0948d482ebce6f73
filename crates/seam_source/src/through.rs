//! Composition of a mapped leaf's map through the map of its inner source.
//!
//! An outer map traces generated text into an intermediate text (the inner
//! source). When that intermediate text has its own map, every outer segment
//! pointing into it is looked up there and rewritten to point at the
//! earliest known original.

use seam_map::{
    MapError, Mapping, NameTable, OriginalLocation, Position, Segment, SourceTable, TextIndex,
};
use tracing::debug;

use crate::normalize::drop_redundant_markers;

/// The intermediate text an outer map points into.
pub(crate) struct Through<'a> {
    /// Identity of the intermediate text in the outer source table.
    pub identity: &'a str,
    /// The intermediate text itself.
    pub text: &'a str,
    /// Map of the intermediate text.
    pub map: &'a Mapping,
    /// Drop outer segments into the intermediate text that the inner map
    /// cannot trace further, and omit the intermediate source.
    pub remove_original: bool,
}

/// Lazily built indexes over the inner map's source contents.
struct ContentIndexes<'m> {
    map: &'m Mapping,
    built: Vec<Option<TextIndex>>,
}

impl<'m> ContentIndexes<'m> {
    fn new(map: &'m Mapping) -> Self {
        Self {
            map,
            built: vec![None; map.sources().len()],
        }
    }

    /// Does the inner source `source` contain `name` at `(line, column)`?
    fn has_name_at(&mut self, source: u32, line: u32, column: u32, name: &str) -> bool {
        let map = self.map;
        let Some(content) = map.source(source).and_then(|e| e.content.as_deref()) else {
            return false;
        };
        let index = self.built[source as usize].get_or_insert_with(|| TextIndex::new(content));
        index
            .offset_of(line, column)
            .and_then(|offset| index.byte_offset(content, offset))
            .is_ok_and(|byte| content[byte..].starts_with(name))
    }
}

/// Rewrites `outer` through the inner map described by `inner`.
///
/// `end` is the end position of the generated text, used to drop trailing
/// markers. Outer sources keep their order at the front of the result; inner
/// sources and every name are registered as segments first use them.
pub(crate) fn compose_through(
    outer: &Mapping,
    inner: Through<'_>,
    end: Position,
) -> Result<Mapping, MapError> {
    let Some(target) = outer
        .sources()
        .iter()
        .position(|s| s.identity.as_deref() == Some(inner.identity))
    else {
        return Ok(outer.clone());
    };

    let mut sources = SourceTable::new();
    let mut names = NameTable::new();
    let outer_sources = outer
        .sources()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            if i != target {
                sources.register_entry(entry).map(Some)
            } else if inner.remove_original {
                Ok(None)
            } else {
                sources.register(Some(inner.identity), Some(inner.text)).map(Some)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    let mut inner_sources: Vec<Option<u32>> = vec![None; inner.map.sources().len()];
    let mut contents = ContentIndexes::new(inner.map);

    let mut segments = Vec::with_capacity(outer.segments().len());
    for seg in outer.segments() {
        let Some(original) = seg.original else {
            segments.push(*seg);
            continue;
        };
        let outer_name = original.name.and_then(|n| outer.name(n));

        if original.source as usize != target {
            let rewritten = outer_sources
                .get(original.source as usize)
                .copied()
                .flatten()
                .map(|source| OriginalLocation {
                    source,
                    name: outer_name.map(|n| names.register(n)),
                    ..original
                });
            segments.push(Segment {
                original: rewritten,
                ..*seg
            });
            continue;
        }

        let hit = inner
            .map
            .last_segment_before(original.line, original.column)
            .and_then(|inner_seg| Some((inner_seg, inner_seg.original?)))
            .filter(|(_, loc)| inner.map.source(loc.source).is_some());

        let rewritten = match hit {
            Some((inner_seg, loc)) => {
                let column = loc.column + (original.column - inner_seg.generated_column);
                let exact = inner_seg.generated_column == original.column;
                let name = match (exact, loc.name.and_then(|n| inner.map.name(n))) {
                    (true, Some(inner_name)) => Some(inner_name),
                    _ => outer_name
                        .filter(|n| contents.has_name_at(loc.source, loc.line, column, n)),
                };
                let source = match inner_sources[loc.source as usize] {
                    Some(source) => source,
                    None => {
                        let source = inner
                            .map
                            .source(loc.source)
                            .map(|entry| sources.register_entry(entry))
                            .transpose()?
                            .unwrap_or_default();
                        inner_sources[loc.source as usize] = Some(source);
                        source
                    }
                };
                Some(OriginalLocation {
                    source,
                    line: loc.line,
                    column,
                    name: name.map(|n| names.register(n)),
                })
            }
            None => outer_sources[target].map(|source| OriginalLocation {
                source,
                name: outer_name.map(|n| names.register(n)),
                ..original
            }),
        };
        segments.push(Segment {
            original: rewritten,
            ..*seg
        });
    }

    let segments = drop_redundant_markers(segments, end);
    debug!(
        identity = inner.identity,
        segments = segments.len(),
        sources = sources.len(),
        remove_original = inner.remove_original,
        "composed map through inner source"
    );
    Ok(
        Mapping::from_parts(segments, sources.into_entries(), names.into_names())?
            .with_file(outer.file().map(str::to_owned)),
    )
}
