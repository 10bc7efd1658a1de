//! Error types for the ingest pipeline.
//!
//! The pipeline stages themselves never fail: a missing field or marker
//! degrades to a sentinel or an empty list. `IngestError` covers the
//! remaining cases that cannot be degraded through: undecodable input,
//! invalid configuration and the I/O owned by the command-line wrapper.

use std::str::Utf8Error;

use thiserror::Error;

/// Main error type for the ingest library.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Input bytes are not valid UTF-8.
    #[error("Document '{document_id}' is not valid UTF-8: {source}")]
    InvalidEncoding {
        document_id: String,
        #[source]
        source: Utf8Error,
    },

    /// Maximum article length must be positive.
    #[error("Invalid maximum article length: {0}. Expected a value greater than zero")]
    InvalidMaxArticleLength(usize),

    /// A configuration value could not be interpreted.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A pattern in the pattern library does not compile.
    #[error("Invalid pattern '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The pattern library is structurally unusable.
    #[error("Invalid pattern library: {0}")]
    InvalidPatternLibrary(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_encoding_display() {
        let bytes = [0x50, 0x61, 0xff, 0x73];
        let source = std::str::from_utf8(&bytes).unwrap_err();
        let err = IngestError::InvalidEncoding {
            document_id: "uu-6-2023".to_string(),
            source,
        };
        let message = err.to_string();
        assert!(message.contains("uu-6-2023"));
        assert!(message.contains("not valid UTF-8"));
    }

    #[test]
    fn test_invalid_max_article_length_display() {
        let err = IngestError::InvalidMaxArticleLength(0);
        assert_eq!(
            err.to_string(),
            "Invalid maximum article length: 0. Expected a value greater than zero"
        );
    }

    #[test]
    fn test_invalid_pattern_display() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = IngestError::InvalidPattern {
            name: "page-number".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid pattern 'page-number':"));
    }
}
