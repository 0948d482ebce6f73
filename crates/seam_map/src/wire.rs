//! The JSON source map wire format (revision 3).

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::MapError;
use crate::mapping::{Mapping, SourceEntry};

/// The only wire format revision this crate reads and writes.
pub const SOURCE_MAP_VERSION: u32 = 3;

/// A source map exactly as it appears on the wire.
///
/// `sources` and `sourcesContent` may hold `null` entries. `sourceRoot` is
/// passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    /// Format revision; must be 3.
    pub version: u32,
    /// Name of the generated file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Prefix for source identities, not interpreted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    /// Source identities.
    #[serde(default)]
    pub sources: Vec<Option<String>>,
    /// Source texts, parallel to `sources`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    /// Symbol names referenced by segments.
    #[serde(default)]
    pub names: Vec<String>,
    /// Base64 VLQ encoded segments.
    pub mappings: String,
}

impl RawSourceMap {
    /// Parses a wire map from JSON.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes this wire map to JSON.
    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Mapping {
    /// Decodes a wire map, validating version and table shapes.
    pub fn from_raw(raw: &RawSourceMap) -> Result<Self, MapError> {
        if raw.version != SOURCE_MAP_VERSION {
            return Err(MapError::UnsupportedVersion {
                version: raw.version,
            });
        }
        if let Some(contents) = &raw.sources_content {
            if contents.len() != raw.sources.len() {
                return Err(MapError::malformed(format!(
                    "sourcesContent has {} entries but sources has {}",
                    contents.len(),
                    raw.sources.len()
                )));
            }
        }

        let sources = raw
            .sources
            .iter()
            .enumerate()
            .map(|(i, identity)| match identity {
                Some(identity) => {
                    let content = raw
                        .sources_content
                        .as_ref()
                        .and_then(|contents| contents[i].clone());
                    SourceEntry::new(identity.clone(), content)
                }
                None => SourceEntry::anonymous(),
            })
            .collect();

        let segments = codec::decode(&raw.mappings)?;
        Ok(Mapping::from_parts(segments, sources, raw.names.clone())?
            .with_file(raw.file.clone())
            .with_source_root(raw.source_root.clone()))
    }

    /// Parses and decodes a JSON wire map.
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Self::from_raw(&RawSourceMap::from_json(json)?)
    }

    /// Encodes this mapping into the wire format.
    ///
    /// `sourcesContent` is emitted only when at least one content is known.
    pub fn to_raw(&self) -> RawSourceMap {
        let has_content = self.sources().iter().any(|s| s.content.is_some());
        RawSourceMap {
            version: SOURCE_MAP_VERSION,
            file: self.file().map(str::to_owned),
            source_root: self.source_root().map(str::to_owned),
            sources: self.sources().iter().map(|s| s.identity.clone()).collect(),
            sources_content: has_content
                .then(|| self.sources().iter().map(|s| s.content.clone()).collect()),
            names: self.names().to_vec(),
            mappings: self.encode_mappings(),
        }
    }

    /// Serializes this mapping as a JSON wire map.
    pub fn to_json(&self) -> Result<String, MapError> {
        self.to_raw().to_json()
    }
}
