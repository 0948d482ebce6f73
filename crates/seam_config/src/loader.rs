//! Option parsing and validation.

use serde::Deserialize;

use crate::error::ConfigError;
use crate::options::MapOptions;

/// Top-level layout of an options document: everything lives under `[map]`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionsFile {
    #[serde(default)]
    map: MapOptions,
}

/// Parses and validates resolution options from a TOML string.
///
/// ```toml
/// [map]
/// columns = false
/// file = "bundle.js"
/// ```
pub fn load_options_from_str(content: &str) -> Result<MapOptions, ConfigError> {
    let file: OptionsFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_options(&file.map)?;
    Ok(file.map)
}

/// Validates that option values are usable.
fn validate_options(options: &MapOptions) -> Result<(), ConfigError> {
    if options.file.as_deref().is_some_and(str::is_empty) {
        return Err(ConfigError::ValidationError(
            "map.file must not be empty".to_string(),
        ));
    }
    Ok(())
}
