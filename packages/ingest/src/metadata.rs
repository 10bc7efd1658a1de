//! Document-level metadata extraction.
//!
//! Type, number, year and topic are read from the title block at the top of
//! the instrument; status phrases are searched over the whole text because
//! they usually sit in the closing formula or in a portal annotation.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::{DOCUMENT_HEAD_MAX_CHARS, TOPIC_MAX_LENGTH};
use crate::patterns::PatternLibrary;
use crate::types::{DocumentMetadata, DocumentStatus, DocumentType};

/// First line that no longer belongs to the title block.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEAD_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:Menimbang\b|MEMUTUSKAN[ \t]*:|BAB[ \t]+[IVXLCDM]+\b|Pasal[ \t]+\d+[A-Za-z]?[ \t]*$)",
    )
    .expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:NOMOR|NO\.)\s*:?\s*([A-Z0-9][A-Z0-9./\-]*)").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bTAHUN\s+((?:19|20)\d{2})\b").expect("valid regex")
});

/// Topic runs from TENTANG to a blank line, the divine-grace formula, the
/// enacting authority on its own line or the end of the title block.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TOPIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)\bTENTANG\s+(.+?)(?:\n[ \t]*\n|DENGAN\s+RAHMAT|\bMenimbang\b|\n[ \t]*PRESIDEN[ \t]+REPUBLIK[ \t]+INDONESIA,?[ \t]*(?:\n|\z)|\z)",
    )
    .expect("valid regex")
});

/// Minimum number of distinct legal markers for text without a type phrase.
const MIN_LEGAL_MARKERS: usize = 2;

/// Pattern-based metadata extractor.
#[derive(Debug, Clone, Copy)]
pub struct MetadataExtractor<'a> {
    library: &'a PatternLibrary,
}

impl Default for MetadataExtractor<'static> {
    fn default() -> Self {
        Self::new(PatternLibrary::builtin())
    }
}

impl<'a> MetadataExtractor<'a> {
    /// Create an extractor using `library` for the type vocabulary and
    /// status phrases.
    #[must_use]
    pub fn new(library: &'a PatternLibrary) -> Self {
        Self { library }
    }

    /// Extract metadata from cleaned text.
    ///
    /// Each field is searched independently; a miss leaves that field
    /// unknown without affecting the others.
    ///
    /// # Examples
    /// ```
    /// use peraturan_ingest::metadata::MetadataExtractor;
    ///
    /// let metadata = MetadataExtractor::default().extract(
    ///     "UNDANG-UNDANG REPUBLIK INDONESIA NOMOR 6 TAHUN 2023 TENTANG CIPTA KERJA",
    /// );
    /// assert_eq!(metadata.doc_type.unwrap().abbrev, "UU");
    /// assert_eq!(metadata.number.as_deref(), Some("6"));
    /// assert_eq!(metadata.year, Some(2023));
    /// ```
    #[must_use]
    pub fn extract(&self, cleaned: &str) -> DocumentMetadata {
        let head = document_head(cleaned);

        let doc_type = self
            .library
            .find_document_type(head)
            .map(|def| DocumentType::new(def.phrase.clone(), def.abbrev.clone()));
        let number = extract_number(head);
        let year = extract_year(head);
        let topic = extract_topic(head);
        let status = self.extract_status(cleaned);

        let metadata = DocumentMetadata::from_fields(doc_type, number, year, topic, status);
        tracing::debug!(
            full_title = %metadata.full_title,
            status = %metadata.status,
            head_chars = head.chars().count(),
            "Extracted metadata"
        );
        metadata
    }

    /// Whether `text` looks like a statutory instrument at all.
    ///
    /// True when a type phrase is present, or when at least two distinct
    /// legal marker phrases occur.
    #[must_use]
    pub fn is_legal_document(&self, text: &str) -> bool {
        if self.library.find_document_type(text).is_some() {
            return true;
        }
        let markers = self
            .library
            .legal_markers()
            .iter()
            .filter(|m| m.regex.is_match(text))
            .count();
        markers >= MIN_LEGAL_MARKERS
    }

    /// Revocation phrases take precedence over enactment phrases.
    fn extract_status(&self, text: &str) -> DocumentStatus {
        if let Some(marker) = self
            .library
            .revoked_markers()
            .iter()
            .find(|m| m.regex.is_match(text))
        {
            tracing::trace!(marker = %marker.name, "Revocation marker found");
            return DocumentStatus::Revoked;
        }
        if self
            .library
            .enacted_markers()
            .iter()
            .any(|m| m.regex.is_match(text))
        {
            return DocumentStatus::Enacted;
        }
        DocumentStatus::Unknown
    }
}

/// The title block: text before the first preamble or structural marker,
/// capped at [`DOCUMENT_HEAD_MAX_CHARS`].
fn document_head(text: &str) -> &str {
    let end = HEAD_END.find(text).map_or(text.len(), |m| m.start());
    let head = &text[..end];
    if head.trim().is_empty() {
        prefix_chars(text, DOCUMENT_HEAD_MAX_CHARS)
    } else {
        prefix_chars(head, DOCUMENT_HEAD_MAX_CHARS)
    }
}

fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn extract_number(head: &str) -> Option<String> {
    let caps = NUMBER.captures(head)?;
    let number = caps[1].trim_end_matches(['.', '/', '-']);
    (!number.is_empty()).then(|| number.to_string())
}

fn extract_year(head: &str) -> Option<u16> {
    YEAR.captures(head)?[1].parse().ok()
}

fn extract_topic(head: &str) -> Option<String> {
    let caps = TOPIC.captures(head)?;
    let collapsed = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
    let topic = prefix_chars(&collapsed, TOPIC_MAX_LENGTH).trim_end();
    (!topic.is_empty()).then(|| topic.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{UNKNOWN, UNTITLED_DOCUMENT};

    fn extract(text: &str) -> DocumentMetadata {
        MetadataExtractor::default().extract(text)
    }

    #[test]
    fn test_extract_cipta_kerja_title() {
        let metadata =
            extract("UNDANG-UNDANG REPUBLIK INDONESIA NOMOR 6 TAHUN 2023 TENTANG CIPTA KERJA");
        let record = metadata.to_record();
        assert_eq!(record.type_abbrev, "UU");
        assert_eq!(record.number, "6");
        assert_eq!(record.year, "2023");
        assert!(record.topic.starts_with("CIPTA KERJA"));
        assert_eq!(record.full_title, "UU No 6 Tahun 2023 Tentang CIPTA KERJA");
    }

    #[test]
    fn test_extract_empty_is_all_unknown() {
        let metadata = extract("");
        assert!(metadata.is_unknown());
        assert_eq!(metadata.full_title, UNTITLED_DOCUMENT);
        let record = metadata.to_record();
        assert_eq!(record.doc_type, UNKNOWN);
        assert_eq!(record.number, UNKNOWN);
        assert_eq!(record.year, UNKNOWN);
        assert_eq!(record.topic, UNKNOWN);
    }

    #[test]
    fn test_extract_multiline_title_block() {
        let text = "PERATURAN PEMERINTAH PENGGANTI UNDANG-UNDANG\n\
                    NOMOR 2 TAHUN 2022\n\
                    TENTANG\n\
                    CIPTA KERJA\n\
                    DENGAN RAHMAT TUHAN YANG MAHA ESA\n\
                    Menimbang: a. bahwa ...";
        let metadata = extract(text);
        assert_eq!(metadata.doc_type.as_ref().unwrap().abbrev, "PERPU");
        assert_eq!(metadata.number.as_deref(), Some("2"));
        assert_eq!(metadata.year, Some(2022));
        assert_eq!(metadata.topic.as_deref(), Some("CIPTA KERJA"));
    }

    #[test]
    fn test_extract_compound_number() {
        let metadata = extract(
            "PERATURAN OTORITAS JASA KEUANGAN\nNOMOR 12/POJK.03/2020.\nTENTANG\nKONSOLIDASI BANK UMUM",
        );
        assert_eq!(metadata.doc_type.unwrap().abbrev, "POJK");
        assert_eq!(metadata.number.as_deref(), Some("12/POJK.03/2020"));
        assert_eq!(metadata.topic.as_deref(), Some("KONSOLIDASI BANK UMUM"));
    }

    #[test]
    fn test_extract_ignores_body_references() {
        let text = "PERATURAN PRESIDEN\nNOMOR 10 TAHUN 2021\nTENTANG\nBIDANG USAHA PENANAMAN MODAL\n\n\
                    Menimbang: bahwa untuk melaksanakan Undang-Undang Nomor 11 Tahun 2020";
        let metadata = extract(text);
        assert_eq!(metadata.doc_type.unwrap().abbrev, "PERPRES");
        assert_eq!(metadata.number.as_deref(), Some("10"));
        assert_eq!(metadata.year, Some(2021));
    }

    #[test]
    fn test_extract_year_out_of_range_is_unknown() {
        let metadata = extract("PERATURAN DAERAH NOMOR 3 TAHUN 1850 TENTANG PASAR");
        assert_eq!(metadata.year, None);
        assert_eq!(metadata.number.as_deref(), Some("3"));
    }

    #[test]
    fn test_extract_topic_is_capped() {
        let long_topic = "KATA ".repeat(100);
        let metadata = extract(&format!("UNDANG-UNDANG NOMOR 1 TAHUN 2020 TENTANG {long_topic}"));
        let topic = metadata.topic.unwrap();
        assert!(topic.chars().count() <= TOPIC_MAX_LENGTH);
        assert!(topic.starts_with("KATA KATA"));
        assert!(!topic.ends_with(' '));
    }

    #[test]
    fn test_extract_topic_mentioning_the_president() {
        let metadata = extract(
            "PERATURAN PRESIDEN\nNOMOR 7 TAHUN 2024\nTENTANG\n\
             PERUBAHAN ATAS PERATURAN PRESIDEN REPUBLIK INDONESIA NOMOR 5 TAHUN 2010\n\
             PRESIDEN REPUBLIK INDONESIA,\nMenimbang: bahwa perlu.",
        );
        assert_eq!(
            metadata.topic.as_deref(),
            Some("PERUBAHAN ATAS PERATURAN PRESIDEN REPUBLIK INDONESIA NOMOR 5 TAHUN 2010")
        );
    }

    #[test]
    fn test_extract_status() {
        let enacted = extract("UNDANG-UNDANG\nPasal 1\nIsi.\nDitetapkan di Jakarta");
        assert_eq!(enacted.status, DocumentStatus::Enacted);

        let revoked = extract("UNDANG-UNDANG\nStatus: Dicabut\nPasal 1\nIsi.\nDitetapkan di Jakarta");
        assert_eq!(revoked.status, DocumentStatus::Revoked);

        let unknown = extract("UNDANG-UNDANG\nPasal 1\nIsi.");
        assert_eq!(unknown.status, DocumentStatus::Unknown);
    }

    #[test]
    fn test_extract_without_title_block_uses_text_start() {
        let metadata = extract("Pasal 1\nPeraturan ini disebut UNDANG-UNDANG TENTANG APA SAJA");
        assert_eq!(metadata.doc_type.unwrap().abbrev, "UU");
    }

    #[test]
    fn test_is_legal_document() {
        let extractor = MetadataExtractor::default();
        assert!(extractor.is_legal_document("PERATURAN MENTERI KEUANGAN NOMOR 1"));
        assert!(extractor.is_legal_document("Menimbang: a. bahwa\nMengingat: 1. Pasal"));
        assert!(!extractor.is_legal_document("Menimbang: satu-satunya penanda"));
        assert!(!extractor.is_legal_document("Resep nasi goreng kampung"));
        assert!(!extractor.is_legal_document(""));
    }

    #[test]
    fn test_prefix_chars_respects_char_boundaries() {
        assert_eq!(prefix_chars("éééé", 2), "éé");
        assert_eq!(prefix_chars("ab", 5), "ab");
    }
}
