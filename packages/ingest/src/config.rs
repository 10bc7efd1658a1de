//! Configuration constants and validation functions for the pipeline.

use std::path::PathBuf;

use crate::error::{IngestError, Result};

/// Default maximum article body length (in characters) before an article
/// is split by clause.
pub const DEFAULT_MAX_ARTICLE_LENGTH: usize = 2000;

/// Maximum preamble length (in characters) when no end marker is found.
pub const PREAMBLE_MAX_SPAN: usize = 5000;

/// Maximum topic length (in characters) kept in metadata.
pub const TOPIC_MAX_LENGTH: usize = 200;

/// Upper bound (in characters) of the title block searched for metadata.
pub const DOCUMENT_HEAD_MAX_CHARS: usize = 3000;

/// Sentinel written for metadata fields that could not be extracted.
pub const UNKNOWN: &str = "UNKNOWN";

/// Title used when no metadata field could be extracted.
pub const UNTITLED_DOCUMENT: &str = "Dokumen Hukum Tanpa Judul";

/// Separator between the parts of a chunk context header.
pub const CONTEXT_SEPARATOR: &str = " - ";

/// Environment variable overriding the maximum article length.
pub const ENV_MAX_ARTICLE_LENGTH: &str = "PERATURAN_MAX_ARTICLE_LENGTH";

/// Environment variable enabling aggressive letterhead stripping.
pub const ENV_STRIP_LETTERHEADS: &str = "PERATURAN_STRIP_LETTERHEADS";

/// Environment variable pointing at a YAML pattern library.
pub const ENV_PATTERN_LIBRARY: &str = "PERATURAN_PATTERN_LIBRARY";

/// Validate the maximum article length.
///
/// # Examples
/// ```
/// use peraturan_ingest::config::validate_max_article_length;
///
/// assert!(validate_max_article_length(2000).is_ok());
/// assert!(validate_max_article_length(0).is_err());
/// ```
pub fn validate_max_article_length(length: usize) -> Result<()> {
    if length == 0 {
        return Err(IngestError::InvalidMaxArticleLength(length));
    }
    Ok(())
}

/// Runtime configuration for a [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Article body length above which an article is split by clause.
    pub max_article_length: usize,

    /// Apply the aggressive letterhead patterns after regular cleaning.
    pub strip_letterheads: bool,

    /// Optional YAML pattern library replacing the built-in one.
    pub pattern_library: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_article_length: DEFAULT_MAX_ARTICLE_LENGTH,
            strip_letterheads: false,
            pattern_library: None,
        }
    }
}

impl PipelineConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// An unparsable or zero `PERATURAN_MAX_ARTICLE_LENGTH` is an error
    /// rather than a silent fallback.
    pub fn from_env() -> Result<Self> {
        let max_article_length = match std::env::var(ENV_MAX_ARTICLE_LENGTH) {
            Ok(value) => {
                let parsed = value.trim().parse::<usize>().map_err(|_| {
                    IngestError::InvalidConfig(format!(
                        "{ENV_MAX_ARTICLE_LENGTH} must be a positive integer, got '{value}'"
                    ))
                })?;
                validate_max_article_length(parsed)?;
                parsed
            }
            Err(_) => DEFAULT_MAX_ARTICLE_LENGTH,
        };

        let strip_letterheads = std::env::var(ENV_STRIP_LETTERHEADS)
            .ok()
            .map(|v| v != "false" && v != "0" && !v.is_empty())
            .unwrap_or(false);

        let pattern_library = std::env::var(ENV_PATTERN_LIBRARY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            max_article_length,
            strip_letterheads,
            pattern_library,
        })
    }

    /// Set the maximum article length.
    #[must_use]
    pub fn with_max_article_length(mut self, max_article_length: usize) -> Self {
        self.max_article_length = max_article_length;
        self
    }

    /// Enable or disable aggressive letterhead stripping.
    #[must_use]
    pub fn with_strip_letterheads(mut self, strip: bool) -> Self {
        self.strip_letterheads = strip;
        self
    }

    /// Use a YAML pattern library instead of the built-in one.
    #[must_use]
    pub fn with_pattern_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.pattern_library = Some(path.into());
        self
    }

    /// Validate all fields.
    pub fn validate(&self) -> Result<()> {
        validate_max_article_length(self.max_article_length)
    }
}
