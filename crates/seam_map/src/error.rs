//! Error types for decoding, indexing, and merging source maps.

/// Errors raised while decoding a source map, indexing text, or merging
/// source tables.
///
/// All of these indicate malformed input (an externally supplied map that is
/// not well-formed, or a tree built with inconsistent arguments) rather than a
/// transient condition, so none of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The `mappings` string or segment ordering is not well-formed.
    #[error("malformed mappings: {reason}")]
    Malformed {
        /// Description of the problem.
        reason: String,
    },

    /// The wire format declares a version other than 3.
    #[error("unsupported source map version {version}, expected 3")]
    UnsupportedVersion {
        /// The version found in the input.
        version: u32,
    },

    /// An offset, line, or column lies outside the indexed text.
    #[error("{what} {value} is out of range (limit {limit})")]
    OutOfRange {
        /// What was out of range, such as `"offset"`, `"line"` or `"child"`.
        what: &'static str,
        /// The requested value.
        value: usize,
        /// The largest accepted value.
        limit: usize,
    },

    /// One source identity was registered with two different known contents.
    #[error("conflicting content registered for source '{identity}'")]
    IdentityConflict {
        /// The identity that collided.
        identity: String,
    },

    /// The JSON wire format could not be parsed or produced.
    #[error("invalid source map JSON: {reason}")]
    Json {
        /// Description of the serde failure.
        reason: String,
    },
}

impl MapError {
    /// Creates a [`MapError::Malformed`] with the given reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for MapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json {
            reason: err.to_string(),
        }
    }
}
