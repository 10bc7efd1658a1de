//! End-to-end document processing.

use std::borrow::Cow;

use serde::Serialize;

use crate::chunker::Chunker;
use crate::cleaner::{CleanReport, Cleaner};
use crate::config::PipelineConfig;
use crate::error::{IngestError, Result};
use crate::metadata::MetadataExtractor;
use crate::patterns::PatternLibrary;
use crate::structure::{StructureParser, StructureTree};
use crate::types::{Chunk, DocumentMetadata};

/// Everything produced for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedDocument {
    pub document_id: String,
    pub cleaned: String,
    pub report: CleanReport,
    pub metadata: DocumentMetadata,
    pub structure: StructureTree,
    pub chunks: Vec<Chunk>,
}

/// Cleaner, metadata extractor, structure parser and chunker composed over
/// one pattern library.
///
/// The pipeline holds no per-document state; one instance can process any
/// number of documents from any number of threads.
#[derive(Debug, Clone)]
pub struct Pipeline {
    library: Cow<'static, PatternLibrary>,
    chunker: Chunker,
    strip_letterheads: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            library: Cow::Borrowed(PatternLibrary::builtin()),
            chunker: Chunker::default(),
            strip_letterheads: false,
        }
    }
}

impl Pipeline {
    /// Build a pipeline from configuration, loading the pattern library
    /// from disk when one is configured.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let library = match &config.pattern_library {
            Some(path) => Cow::Owned(PatternLibrary::from_yaml_file(path)?),
            None => Cow::Borrowed(PatternLibrary::builtin()),
        };
        Self::build(config, library)
    }

    /// Build a pipeline around an already compiled library.
    pub fn with_library(config: &PipelineConfig, library: PatternLibrary) -> Result<Self> {
        Self::build(config, Cow::Owned(library))
    }

    fn build(config: &PipelineConfig, library: Cow<'static, PatternLibrary>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            library,
            chunker: Chunker::new(config.max_article_length)?,
            strip_letterheads: config.strip_letterheads,
        })
    }

    #[must_use]
    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    #[must_use]
    pub fn chunker(&self) -> Chunker {
        self.chunker
    }

    #[must_use]
    pub fn cleaner(&self) -> Cleaner<'_> {
        Cleaner::new(&self.library)
    }

    #[must_use]
    pub fn metadata_extractor(&self) -> MetadataExtractor<'_> {
        MetadataExtractor::new(&self.library)
    }

    /// Run every stage over a raw document.
    ///
    /// # Examples
    /// ```
    /// use peraturan_ingest::Pipeline;
    ///
    /// let raw = "UNDANG-UNDANG REPUBLIK INDONESIA\nNOMOR 6 TAHUN 2023\nTENTANG\nCIPTA KERJA\n\n\
    ///            Pasal 1\nDalam Undang-Undang ini yang dimaksud dengan:";
    /// let document = Pipeline::default().process("uu-6-2023", raw);
    /// assert_eq!(document.chunks.len(), 1);
    /// assert_eq!(document.chunks[0].article_number.as_deref(), Some("1"));
    /// assert_eq!(document.metadata.year, Some(2023));
    /// ```
    #[must_use]
    pub fn process(&self, document_id: &str, raw: &str) -> ProcessedDocument {
        let cleaner = self.cleaner();
        let (mut cleaned, report) = cleaner.clean_with_report(raw);
        if self.strip_letterheads {
            cleaned = cleaner.strip_letterheads(&cleaned);
        }

        let metadata = self.metadata_extractor().extract(&cleaned);
        let structure = StructureParser::new().parse(&cleaned);
        let chunks = self
            .chunker
            .chunk(document_id, &cleaned, &metadata, Some(&structure));

        tracing::debug!(
            document_id,
            title = %metadata.full_title,
            articles = structure.articles.len(),
            chunks = chunks.len(),
            "Processed document"
        );

        ProcessedDocument {
            document_id: document_id.to_string(),
            cleaned,
            report,
            metadata,
            structure,
            chunks,
        }
    }

    /// Validate that `raw` is UTF-8, then [`process`](Self::process) it.
    ///
    /// Undecodable input is the only failure; it is reported before any
    /// stage runs.
    pub fn process_bytes(&self, document_id: &str, raw: &[u8]) -> Result<ProcessedDocument> {
        let text = std::str::from_utf8(raw).map_err(|source| IngestError::InvalidEncoding {
            document_id: document_id.to_string(),
            source,
        })?;
        Ok(self.process(document_id, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UNKNOWN;
    use crate::patterns::PatternLibrarySource;

    #[test]
    fn test_pipeline_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Pipeline>();
        assert_send_sync::<ProcessedDocument>();
    }

    #[test]
    fn test_process_empty() {
        let document = Pipeline::default().process("empty", "");
        assert_eq!(document.cleaned, "");
        assert!(document.metadata.is_unknown());
        assert!(document.structure.is_empty());
        assert!(document.chunks.is_empty());
    }

    #[test]
    fn test_process_bytes_rejects_invalid_utf8() {
        let err = Pipeline::default()
            .process_bytes("broken", &[b'P', 0xff, b'a'])
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::InvalidEncoding { ref document_id, .. } if document_id == "broken"
        ));
    }

    #[test]
    fn test_process_bytes_accepts_utf8() {
        let document = Pipeline::default()
            .process_bytes("ok", "Pasal 1\nIsi ketentuan.".as_bytes())
            .unwrap();
        assert_eq!(document.chunks.len(), 1);
        assert_eq!(document.chunks[0].metadata.number, UNKNOWN);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = PipelineConfig::default().with_max_article_length(0);
        assert!(matches!(
            Pipeline::new(&config),
            Err(IngestError::InvalidMaxArticleLength(0))
        ));
    }

    #[test]
    fn test_new_applies_max_article_length() {
        let config = PipelineConfig::default().with_max_article_length(150);
        let pipeline = Pipeline::new(&config).unwrap();
        assert_eq!(pipeline.chunker().max_article_length(), 150);
        assert_eq!(Pipeline::default().chunker(), Chunker::default());
    }

    #[test]
    fn test_new_reports_missing_library_file() {
        let config = PipelineConfig::default().with_pattern_library("/nonexistent/patterns.yaml");
        assert!(matches!(Pipeline::new(&config), Err(IngestError::Io(_))));
    }

    #[test]
    fn test_strip_letterheads_config() {
        let raw = "KEMENTERIAN KEUANGAN\nPasal 1\nIsi.";
        let plain = Pipeline::default().process("doc", raw);
        assert!(plain.cleaned.starts_with("KEMENTERIAN KEUANGAN"));

        let config = PipelineConfig::default().with_strip_letterheads(true);
        let stripped = Pipeline::new(&config).unwrap().process("doc", raw);
        assert_eq!(stripped.cleaned, "Pasal 1\nIsi.");
    }

    #[test]
    fn test_with_custom_library() {
        let mut source = PatternLibrarySource::builtin();
        source.version = "custom-1".to_string();
        source.noise_patterns.push(crate::patterns::NamedPattern::new(
            "portal-footer",
            r"^Diunduh dari portal[^\n]*$",
        ));
        let library = PatternLibrary::compile(&source).unwrap();
        let pipeline = Pipeline::with_library(&PipelineConfig::default(), library).unwrap();
        assert_eq!(pipeline.library().version(), "custom-1");

        let document = pipeline.process("doc", "Pasal 1\nIsi.\nDiunduh dari portal resmi");
        assert_eq!(document.cleaned, "Pasal 1\nIsi.");
    }
}
