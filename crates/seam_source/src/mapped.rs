//! Leaves that arrive with an externally produced source map.

use std::sync::OnceLock;

use seam_common::ContentHasher;
use seam_map::{MapError, Mapping, RawSourceMap, TextIndex};
use tracing::debug;

use crate::normalize::{drop_redundant_markers, sanitize};
use crate::plan::Resolved;
use crate::through::{compose_through, Through};

/// The intermediate text a [`MappedSource`]'s map points into, with that
/// text's own map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerSource {
    text: String,
    map: Option<RawSourceMap>,
    remove_original: bool,
}

impl InnerSource {
    /// Describes the intermediate text and its map.
    pub fn new(text: impl Into<String>, map: Option<RawSourceMap>) -> Self {
        Self {
            text: text.into(),
            map,
            remove_original: false,
        }
    }

    /// Drops positions the inner map cannot trace, and the intermediate
    /// source itself, from the composed map.
    pub fn remove_original(mut self, remove: bool) -> Self {
        self.remove_original = remove;
        self
    }
}

/// A leaf whose text was produced elsewhere together with a wire map.
///
/// The wire map is decoded on first use and cached for the lifetime of the
/// node.
#[derive(Debug)]
pub struct MappedSource {
    text: String,
    identity: String,
    map: RawSourceMap,
    inner: Option<InnerSource>,
    decoded: OnceLock<Result<Mapping, MapError>>,
}

impl Clone for MappedSource {
    fn clone(&self) -> Self {
        Self {
            text: self.text.clone(),
            identity: self.identity.clone(),
            map: self.map.clone(),
            inner: self.inner.clone(),
            decoded: self.decoded.clone(),
        }
    }
}

impl PartialEq for MappedSource {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.identity == other.identity
            && self.map == other.map
            && self.inner == other.inner
    }
}

impl Eq for MappedSource {}

impl MappedSource {
    /// Wraps `text` and the map describing where it came from.
    ///
    /// `identity` names the text the map was generated from, as it appears
    /// among the map's sources once `sourceRoot` is joined on. It is only
    /// consulted when an [`InnerSource`] is attached.
    pub fn new(text: impl Into<String>, identity: impl Into<String>, map: RawSourceMap) -> Self {
        Self {
            text: text.into(),
            identity: identity.into(),
            map,
            inner: None,
            decoded: OnceLock::new(),
        }
    }

    /// Attaches the intermediate text the map points into.
    pub fn with_inner(mut self, inner: InnerSource) -> Self {
        self.inner = Some(inner);
        self.decoded = OnceLock::new();
        self
    }

    /// The stored text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The identity of the text the map was generated from.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The decoded map, composed through the inner source when one is
    /// attached.
    ///
    /// `sourceRoot` is already joined onto the sources; `file` is kept as
    /// declared, but parents and [`Source::map`](crate::Source::map) drop it.
    pub fn mapping(&self) -> Result<&Mapping, MapError> {
        self.decoded
            .get_or_init(|| self.decode())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn decode(&self) -> Result<Mapping, MapError> {
        let outer = normalized(Mapping::from_raw(&self.map)?, &self.text)?;
        debug!(
            identity = %self.identity,
            segments = outer.segments().len(),
            sources = outer.sources().len(),
            "decoded wire map"
        );
        let Some(inner) = &self.inner else {
            return Ok(outer);
        };
        let Some(inner_raw) = &inner.map else {
            return Ok(outer);
        };
        let inner_map = normalized(Mapping::from_raw(inner_raw)?, &inner.text)?;
        let end = TextIndex::new(&self.text).end_position();
        compose_through(
            &outer,
            Through {
                identity: &self.identity,
                text: &inner.text,
                map: &inner_map,
                remove_original: inner.remove_original,
            },
            end,
        )
    }

    pub(crate) fn resolve(&self, with_map: bool) -> Result<Resolved, MapError> {
        Ok(Resolved {
            text: self.text.clone(),
            map: with_map
                .then(|| self.mapping().map(|m| m.clone().with_file(None)))
                .transpose()?,
            identity: None,
        })
    }

    pub(crate) fn update_hash<H: ContentHasher>(&self, hasher: &mut H) {
        hasher.update_str(&self.text);
        hasher.update_str(&self.identity);
        hash_raw_map(&self.map, hasher);
        match &self.inner {
            Some(inner) => {
                hasher.update(&[1]);
                hasher.update_str(&inner.text);
                hasher.update(&[inner.remove_original as u8]);
                match &inner.map {
                    Some(map) => {
                        hasher.update(&[1]);
                        hash_raw_map(map, hasher);
                    }
                    None => hasher.update(&[0]),
                }
            }
            None => hasher.update(&[0]),
        }
    }
}

/// Cleans a freshly decoded map against the text it describes.
///
/// Segments at or past the end of the text describe nothing and are cut.
fn normalized(mapping: Mapping, text: &str) -> Result<Mapping, MapError> {
    let end = TextIndex::new(text).end_position();
    let mapping = sanitize(mapping)?.with_source_root_applied();
    let file = mapping.file().map(str::to_owned);
    let inside = mapping.first_index_at(end);
    let (mut segments, sources, names) = mapping.into_parts();
    segments.truncate(inside);
    Ok(
        Mapping::from_parts(drop_redundant_markers(segments, end), sources, names)?
            .with_file(file),
    )
}

fn hash_raw_map<H: ContentHasher>(map: &RawSourceMap, hasher: &mut H) {
    hasher.update_u64(map.version as u64);
    hasher.update_opt_str(map.file.as_deref());
    hasher.update_opt_str(map.source_root.as_deref());
    hasher.update_u64(map.sources.len() as u64);
    for source in &map.sources {
        hasher.update_opt_str(source.as_deref());
    }
    match &map.sources_content {
        Some(contents) => {
            hasher.update(&[1]);
            hasher.update_u64(contents.len() as u64);
            for content in contents {
                hasher.update_opt_str(content.as_deref());
            }
        }
        None => hasher.update(&[0]),
    }
    hasher.update_u64(map.names.len() as u64);
    for name in &map.names {
        hasher.update_str(name);
    }
    hasher.update_str(&map.mappings);
}
