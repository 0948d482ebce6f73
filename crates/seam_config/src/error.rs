//! Error types for option loading and validation.

/// Errors that can occur when loading or validating resolution options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML content could not be parsed.
    #[error("failed to parse options: {0}")]
    ParseError(String),

    /// An option value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse options: expected '=' at line 3"
        );
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("map.file must not be empty".to_string());
        assert_eq!(
            format!("{err}"),
            "validation error: map.file must not be empty"
        );
    }
}
