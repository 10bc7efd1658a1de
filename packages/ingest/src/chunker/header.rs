//! `[CONTEXT: ...]` header lines injected at the top of every chunk.

use crate::config::{CONTEXT_SEPARATOR, UNTITLED_DOCUMENT};
use crate::types::DocumentMetadata;

/// Label of the elucidation section in headers.
pub const ELUCIDATION_LABEL: &str = "PENJELASAN";

/// Builder for a single-line context header.
///
/// # Examples
/// ```
/// use peraturan_ingest::chunker::ContextHeader;
/// use peraturan_ingest::types::{DocumentMetadata, DocumentStatus, DocumentType};
///
/// let metadata = DocumentMetadata::from_fields(
///     Some(DocumentType::new("UNDANG-UNDANG", "UU")),
///     Some("6".to_string()),
///     Some(2023),
///     Some("CIPTA KERJA".to_string()),
///     DocumentStatus::Enacted,
/// );
/// let header = ContextHeader::new(&metadata)
///     .with_chapter("BAB I KETENTUAN UMUM")
///     .with_location("Pasal 1")
///     .render();
/// assert_eq!(
///     header,
///     "[CONTEXT: UU - NO 6 - TAHUN 2023 - TENTANG CIPTA KERJA - BAB I KETENTUAN UMUM - Pasal 1]"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ContextHeader<'a> {
    metadata: &'a DocumentMetadata,
    chapter: Option<String>,
    location: Option<String>,
}

impl<'a> ContextHeader<'a> {
    #[must_use]
    pub fn new(metadata: &'a DocumentMetadata) -> Self {
        Self {
            metadata,
            chapter: None,
            location: None,
        }
    }

    /// Set the chapter label (e.g. "BAB I KETENTUAN UMUM").
    #[must_use]
    pub fn with_chapter(mut self, chapter: impl Into<String>) -> Self {
        self.chapter = Some(chapter.into());
        self
    }

    /// Set the position label (e.g. "Pasal 2 Ayat (1)").
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Render the header. Unknown metadata fields are left out; a document
    /// without any known field is named by the untitled placeholder.
    #[must_use]
    pub fn render(&self) -> String {
        let metadata = self.metadata;
        let mut parts: Vec<String> = Vec::new();

        if let Some(doc_type) = &metadata.doc_type {
            parts.push(doc_type.abbrev.clone());
        }
        if let Some(number) = &metadata.number {
            parts.push(format!("NO {number}"));
        }
        if let Some(year) = metadata.year {
            parts.push(format!("TAHUN {year}"));
        }
        if let Some(topic) = &metadata.topic {
            parts.push(format!("TENTANG {topic}"));
        }
        if parts.is_empty() {
            parts.push(UNTITLED_DOCUMENT.to_string());
        }

        parts.extend(self.chapter.iter().cloned());
        parts.extend(self.location.iter().cloned());

        let line = parts
            .iter()
            .map(|part| single_line(part))
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);
        format!("[CONTEXT: {line}]")
    }
}

/// `"Pasal 2"` or `"Pasal 2 Ayat (1)"`.
#[must_use]
pub fn article_location(article: &str, clause: Option<&str>) -> String {
    match clause {
        Some(clause) => format!("Pasal {article} Ayat ({clause})"),
        None => format!("Pasal {article}"),
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocumentStatus, DocumentType};

    #[test]
    fn test_header_unknown_metadata() {
        let metadata = DocumentMetadata::default();
        assert_eq!(
            ContextHeader::new(&metadata).render(),
            format!("[CONTEXT: {UNTITLED_DOCUMENT}]")
        );
        assert_eq!(
            ContextHeader::new(&metadata).with_location("Pasal 3").render(),
            format!("[CONTEXT: {UNTITLED_DOCUMENT} - Pasal 3]")
        );
    }

    #[test]
    fn test_header_skips_unknown_fields() {
        let metadata = DocumentMetadata::from_fields(
            Some(DocumentType::new("PERATURAN PEMERINTAH", "PP")),
            None,
            Some(2021),
            None,
            DocumentStatus::Unknown,
        );
        assert_eq!(
            ContextHeader::new(&metadata)
                .with_location(article_location("4", Some("2")))
                .render(),
            "[CONTEXT: PP - TAHUN 2021 - Pasal 4 Ayat (2)]"
        );
    }

    #[test]
    fn test_header_is_single_line() {
        let metadata = DocumentMetadata::default();
        let header = ContextHeader::new(&metadata)
            .with_chapter("BAB I\nKETENTUAN   UMUM")
            .render();
        assert!(!header.contains('\n'));
        assert!(header.ends_with("BAB I KETENTUAN UMUM]"));
    }

    #[test]
    fn test_article_location() {
        assert_eq!(article_location("12A", None), "Pasal 12A");
        assert_eq!(article_location("2", Some("1a")), "Pasal 2 Ayat (1a)");
    }
}
