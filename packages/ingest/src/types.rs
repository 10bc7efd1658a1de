//! Core data types shared by the pipeline stages.
//!
//! These types describe an Indonesian statutory instrument after
//! extraction: its metadata and the retrieval chunks cut from it. The
//! structure tree lives in [`crate::structure`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{UNKNOWN, UNTITLED_DOCUMENT};

/// Instrument type resolved from the type vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    /// Canonical phrase (e.g. "PERATURAN PEMERINTAH").
    pub name: String,

    /// Abbreviation (e.g. "PP").
    pub abbrev: String,
}

impl DocumentType {
    /// Create a new document type.
    #[must_use]
    pub fn new(name: impl Into<String>, abbrev: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abbrev: abbrev.into(),
        }
    }
}

/// Enactment status of an instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Enacted and promulgated.
    Enacted,

    /// Revoked by a later instrument.
    Revoked,

    /// No status phrase found.
    #[default]
    Unknown,
}

impl DocumentStatus {
    /// Get the string value for serialized output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enacted => "enacted",
            Self::Revoked => "revoked",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document-level metadata.
///
/// A field that could not be extracted is `None` (or
/// [`DocumentStatus::Unknown`]); it only turns into the `UNKNOWN` sentinel
/// when flattened into a [`MetadataRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub doc_type: Option<DocumentType>,
    pub number: Option<String>,
    pub year: Option<u16>,
    pub topic: Option<String>,
    pub status: DocumentStatus,

    /// Human-readable title composed from the known fields.
    pub full_title: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self::from_fields(None, None, None, None, DocumentStatus::Unknown)
    }
}

impl DocumentMetadata {
    /// Build metadata and derive `full_title` from the given fields.
    #[must_use]
    pub fn from_fields(
        doc_type: Option<DocumentType>,
        number: Option<String>,
        year: Option<u16>,
        topic: Option<String>,
        status: DocumentStatus,
    ) -> Self {
        let mut metadata = Self {
            doc_type,
            number,
            year,
            topic,
            status,
            full_title: String::new(),
        };
        metadata.full_title = metadata.compose_full_title();
        metadata
    }

    /// Compose `"{abbrev} No {number} Tahun {year} Tentang {topic}"` from
    /// the known fields only.
    ///
    /// # Examples
    /// ```
    /// use peraturan_ingest::types::{DocumentMetadata, DocumentStatus, DocumentType};
    ///
    /// let metadata = DocumentMetadata::from_fields(
    ///     Some(DocumentType::new("UNDANG-UNDANG", "UU")),
    ///     Some("6".to_string()),
    ///     None,
    ///     Some("CIPTA KERJA".to_string()),
    ///     DocumentStatus::Enacted,
    /// );
    /// assert_eq!(metadata.full_title, "UU No 6 Tentang CIPTA KERJA");
    /// ```
    #[must_use]
    pub fn compose_full_title(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(doc_type) = &self.doc_type {
            parts.push(doc_type.abbrev.clone());
        }
        if let Some(number) = &self.number {
            parts.push(format!("No {number}"));
        }
        if let Some(year) = self.year {
            parts.push(format!("Tahun {year}"));
        }
        if let Some(topic) = &self.topic {
            parts.push(format!("Tentang {topic}"));
        }

        if parts.is_empty() {
            UNTITLED_DOCUMENT.to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Whether no field could be extracted.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.doc_type.is_none()
            && self.number.is_none()
            && self.year.is_none()
            && self.topic.is_none()
            && self.status == DocumentStatus::Unknown
    }

    /// Flatten into a record with `UNKNOWN` sentinels.
    #[must_use]
    pub fn to_record(&self) -> MetadataRecord {
        let or_unknown = |value: Option<&str>| value.unwrap_or(UNKNOWN).to_string();
        MetadataRecord {
            doc_type: or_unknown(self.doc_type.as_ref().map(|t| t.name.as_str())),
            type_abbrev: or_unknown(self.doc_type.as_ref().map(|t| t.abbrev.as_str())),
            number: or_unknown(self.number.as_deref()),
            year: self
                .year
                .map_or_else(|| UNKNOWN.to_string(), |y| y.to_string()),
            topic: or_unknown(self.topic.as_deref()),
            status: self.status,
            full_title: self.full_title.clone(),
        }
    }
}

/// Flat metadata record attached to every chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    #[serde(rename = "type")]
    pub doc_type: String,
    pub type_abbrev: String,
    pub number: String,
    pub year: String,
    pub topic: String,
    pub status: DocumentStatus,
    pub full_title: String,
}

/// Part of the document a chunk was cut from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkSection {
    /// Operative body (articles), or the whole text when it has no articles.
    #[default]
    Body,

    /// Elucidation appended after the operative body.
    Elucidation,
}

/// A retrieval-ready piece of a document.
///
/// `text` always starts with a single `[CONTEXT: ...]` header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Caller-supplied identifier of the source document.
    pub document_id: String,

    /// Context header line followed by the body text.
    pub text: String,

    /// Position in the document's chunk sequence.
    pub chunk_index: usize,

    /// Length of the document's chunk sequence.
    pub total_chunks: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clause_number: Option<String>,

    /// Chapter label (e.g. "BAB I KETENTUAN UMUM").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,

    /// Article explained by an elucidation chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explains_article: Option<String>,

    #[serde(default)]
    pub section: ChunkSection,

    #[serde(flatten)]
    pub metadata: MetadataRecord,
}

impl Chunk {
    /// The context header line.
    #[must_use]
    pub fn header(&self) -> &str {
        self.text.split_once('\n').map_or(self.text.as_str(), |(h, _)| h)
    }

    /// The text after the context header.
    #[must_use]
    pub fn body(&self) -> &str {
        self.text.split_once('\n').map_or("", |(_, b)| b)
    }

    /// Body length in characters.
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body().chars().count()
    }
}
