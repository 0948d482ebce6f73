//! Options accepted by `map` and `text_and_map` resolution.

use serde::Deserialize;

/// How a source tree's map should be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapOptions {
    /// Keep column information. When `false` the map is collapsed to one
    /// segment per generated line at column 0.
    pub columns: bool,
    /// Value for the map's `file` field.
    pub file: Option<String>,
}

impl MapOptions {
    /// Returns options that collapse the map to line granularity.
    pub fn lines_only() -> Self {
        Self {
            columns: false,
            ..Self::default()
        }
    }

    /// Returns the same options with `file` set.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            columns: true,
            file: None,
        }
    }
}
