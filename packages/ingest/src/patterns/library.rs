//! Versioned pattern library for the cleaner and the metadata extractor.
//!
//! The library is plain data: a [`PatternLibrarySource`] can be written in
//! YAML and compiled into a [`PatternLibrary`] once at startup. The
//! built-in source mirrors the boilerplate found in documents published on
//! the national legislation portals.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Version tag of the built-in library.
pub const BUILTIN_VERSION: &str = "2024.1";

/// A named regular expression as written in the library source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPattern {
    /// Identifier used in diagnostics.
    pub name: String,

    /// Regular expression, compiled in multi-line mode.
    pub pattern: String,
}

impl NamedPattern {
    /// Create a new named pattern.
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// One entry of the instrument type vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTypeEntry {
    /// Canonical phrase as it appears in titles (e.g. "PERATURAN PEMERINTAH").
    pub phrase: String,

    /// Abbreviation used in context headers (e.g. "PP").
    pub abbrev: String,
}

impl DocumentTypeEntry {
    /// Create a new vocabulary entry.
    #[must_use]
    pub fn new(phrase: impl Into<String>, abbrev: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            abbrev: abbrev.into(),
        }
    }
}

/// Serializable description of a pattern library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternLibrarySource {
    /// Library version, reported in logs.
    pub version: String,

    /// Boilerplate removed by the default cleaning pass.
    #[serde(default)]
    pub noise_patterns: Vec<NamedPattern>,

    /// Institutional letterheads removed only on explicit request.
    #[serde(default)]
    pub letterhead_patterns: Vec<NamedPattern>,

    /// Instrument type vocabulary.
    #[serde(default)]
    pub document_types: Vec<DocumentTypeEntry>,

    /// Phrases indicating the instrument was enacted.
    #[serde(default)]
    pub enacted_markers: Vec<NamedPattern>,

    /// Phrases indicating the instrument has been revoked.
    #[serde(default)]
    pub revoked_markers: Vec<NamedPattern>,

    /// Phrases typical of statutory instruments.
    #[serde(default)]
    pub legal_markers: Vec<NamedPattern>,
}

impl PatternLibrarySource {
    /// The built-in library source.
    #[must_use]
    pub fn builtin() -> Self {
        let named = |entries: &[(&str, &str)]| -> Vec<NamedPattern> {
            entries
                .iter()
                .map(|(name, pattern)| NamedPattern::new(*name, *pattern))
                .collect()
        };

        Self {
            version: BUILTIN_VERSION.to_string(),
            noise_patterns: named(BUILTIN_NOISE),
            letterhead_patterns: named(BUILTIN_LETTERHEADS),
            document_types: BUILTIN_DOCUMENT_TYPES
                .iter()
                .map(|(phrase, abbrev)| DocumentTypeEntry::new(*phrase, *abbrev))
                .collect(),
            enacted_markers: named(BUILTIN_ENACTED),
            revoked_markers: named(BUILTIN_REVOKED),
            legal_markers: named(BUILTIN_LEGAL_MARKERS),
        }
    }
}

const BUILTIN_NOISE: &[(&str, &str)] = &[
    (
        "letterhead-president",
        r"^[ \t]*PRESIDEN[ \t]+REPUBLIK[ \t]+INDONESIA[ \t]*$",
    ),
    ("copy-stamp", r"^[ \t]*SALINAN[ \t]*$"),
    (
        "certified-copy",
        r"(?i)^[ \t]*Salinan[ \t]+sesuai[ \t]+dengan[ \t]+aslinya[^\n]*$",
    ),
    (
        "state-secretariat",
        r"^[ \t]*KEMENTERIAN[ \t]+SEKRETARIAT[ \t]+NEGARA(?:[ \t]+REPUBLIK[ \t]+INDONESIA)?[ \t]*$",
    ),
    (
        "page-number-dashed",
        r"^[ \t]*[\x{2012}\x{2013}\x{2014}\x{2212}-]{1,3}[ \t]*\d+[ \t]*[\x{2012}\x{2013}\x{2014}\x{2212}-]{1,3}[ \t]*$",
    ),
    (
        "page-number-halaman",
        r"(?i)^[ \t]*Hal(?:\.|aman)[ \t]*\d+(?:[ \t]+dari[ \t]+\d+)?[ \t]*$",
    ),
    ("page-number-plain", r"^[ \t]*\d{1,4}[ \t]*$"),
    ("portal-watermark", r"(?i)^[ \t]*(?:https?://)?www\.[a-z0-9.\-]+\.go\.id/?[ \t]*$"),
    ("catchword", r"^[^\n]{0,80}?[ \t]\.[ \t]\.[ \t]\.[ \t]*$"),
];

const BUILTIN_LETTERHEADS: &[(&str, &str)] = &[
    (
        "ministry-header",
        r"^[ \t]*(?:KEMENTERIAN|KEMENTRIAN)[ \t]+[A-Z][A-Z ,\t]{2,80}$",
    ),
    (
        "minister-header",
        r"^[ \t]*MENTERI[ \t]+[A-Z][A-Z ,\t]{2,80}?REPUBLIK[ \t]+INDONESIA[ \t]*$",
    ),
    (
        "regional-head-header",
        r"^[ \t]*(?:GUBERNUR|BUPATI|WALI[ \t]?KOTA)[ \t]+[A-Z][A-Z \t]{2,60}$",
    ),
    (
        "deputy-signature",
        r"(?i)^[ \t]*Deputi[ \t]+Bidang[ \t]+(?:Hukum|Perundang-undangan)[^\n]*$",
    ),
    ("republic-line", r"^[ \t]*REPUBLIK[ \t]+INDONESIA[ \t]*$"),
];

/// Instrument types. Order is irrelevant: longer phrases win at equal positions.
const BUILTIN_DOCUMENT_TYPES: &[(&str, &str)] = &[
    ("UNDANG-UNDANG DASAR", "UUD"),
    ("PERATURAN PEMERINTAH PENGGANTI UNDANG-UNDANG", "PERPU"),
    ("UNDANG-UNDANG", "UU"),
    ("PERATURAN PEMERINTAH", "PP"),
    ("PERATURAN PRESIDEN", "PERPRES"),
    ("KEPUTUSAN PRESIDEN", "KEPPRES"),
    ("INSTRUKSI PRESIDEN", "INPRES"),
    ("PERATURAN MENTERI", "PERMEN"),
    ("KEPUTUSAN MENTERI", "KEPMEN"),
    ("PERATURAN BADAN", "PERBAN"),
    ("PERATURAN LEMBAGA", "PERLEM"),
    ("PERATURAN BANK INDONESIA", "PBI"),
    ("PERATURAN OTORITAS JASA KEUANGAN", "POJK"),
    ("PERATURAN MAHKAMAH AGUNG", "PERMA"),
    ("PERATURAN MAHKAMAH KONSTITUSI", "PMK"),
    ("PERATURAN DAERAH", "PERDA"),
    ("PERATURAN GUBERNUR", "PERGUB"),
    ("PERATURAN BUPATI", "PERBUP"),
    ("PERATURAN WALI KOTA", "PERWALI"),
    ("PERATURAN WALIKOTA", "PERWALI"),
];

const BUILTIN_ENACTED: &[(&str, &str)] = &[
    ("enacted-at", r"(?i)\b(?:Ditetapkan|Disahkan)[ \t]+di\b"),
    ("promulgated-at", r"(?i)\bDiundangkan[ \t]+di\b"),
    ("in-force-from", r"(?i)\bmulai[ \t]+berlaku[ \t]+pada[ \t]+tanggal[ \t]+diundangkan\b"),
];

const BUILTIN_REVOKED: &[(&str, &str)] = &[
    ("status-revoked", r"(?i)\bstatus[ \t]*:?[ \t]*dicabut\b"),
    ("already-revoked", r"(?i)\b(?:telah|sudah)[ \t]+dicabut\b"),
    ("no-longer-in-force", r"(?i)\bsudah[ \t]+tidak[ \t]+berlaku\b"),
];

const BUILTIN_LEGAL_MARKERS: &[(&str, &str)] = &[
    ("considering", r"(?m)^[ \t]*Menimbang\b"),
    ("observing", r"(?m)^[ \t]*Mengingat\b"),
    ("deciding", r"(?m)^[ \t]*MEMUTUSKAN[ \t]*:"),
    ("enacting", r"(?m)^[ \t]*Menetapkan[ \t]*:"),
    ("article", r"(?m)^[ \t]*Pasal[ \t]+\d+[A-Za-z]?[ \t]*$"),
    ("chapter", r"(?m)^[ \t]*BAB[ \t]+[IVXLCDM]+\b"),
    ("divine-grace", r"(?i)DENGAN[ \t]+RAHMAT[ \t]+TUHAN[ \t]+YANG[ \t]+MAHA[ \t]+ESA"),
];

/// A compiled pattern with its name kept for diagnostics.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: String,
    pub regex: Regex,
}

/// A compiled instrument type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTypeDef {
    pub phrase: String,
    pub abbrev: String,
}

/// Compiled, immutable pattern library.
///
/// Compile once and share by reference; every component only reads it.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    version: String,
    noise: Vec<CompiledPattern>,
    letterheads: Vec<CompiledPattern>,
    document_types: Vec<DocumentTypeDef>,
    document_type_regex: Option<Regex>,
    enacted: Vec<CompiledPattern>,
    revoked: Vec<CompiledPattern>,
    legal_markers: Vec<CompiledPattern>,
}

#[allow(clippy::expect_used)] // The built-in source is covered by tests
static BUILTIN: LazyLock<PatternLibrary> = LazyLock::new(|| {
    PatternLibrary::compile(&PatternLibrarySource::builtin()).expect("valid built-in library")
});

impl PatternLibrary {
    /// The built-in library, compiled on first use.
    #[must_use]
    pub fn builtin() -> &'static PatternLibrary {
        &BUILTIN
    }

    /// Compile a library source.
    pub fn compile(source: &PatternLibrarySource) -> Result<Self> {
        if source.version.trim().is_empty() {
            return Err(IngestError::InvalidPatternLibrary(
                "missing version".to_string(),
            ));
        }

        let mut document_types: Vec<DocumentTypeDef> = Vec::new();
        for entry in &source.document_types {
            let phrase = collapse_whitespace(&entry.phrase).to_uppercase();
            let abbrev = entry.abbrev.trim().to_string();
            if phrase.is_empty() || abbrev.is_empty() {
                return Err(IngestError::InvalidPatternLibrary(format!(
                    "document type entry '{}' needs both phrase and abbrev",
                    entry.phrase
                )));
            }
            document_types.push(DocumentTypeDef { phrase, abbrev });
        }
        // Longest first: the alternation is leftmost-first, so at a given
        // position the longest phrase must be tried before its prefixes.
        document_types.sort_by(|a, b| b.phrase.len().cmp(&a.phrase.len()));

        Ok(Self {
            version: source.version.trim().to_string(),
            noise: compile_all(&source.noise_patterns)?,
            letterheads: compile_all(&source.letterhead_patterns)?,
            document_type_regex: build_type_regex(&document_types)?,
            document_types,
            enacted: compile_all(&source.enacted_markers)?,
            revoked: compile_all(&source.revoked_markers)?,
            legal_markers: compile_all(&source.legal_markers)?,
        })
    }

    /// Parse and compile a YAML library.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let source: PatternLibrarySource = serde_yaml_ng::from_str(yaml)?;
        Self::compile(&source)
    }

    /// Read, parse and compile a YAML library file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let library = Self::from_yaml_str(&yaml)?;
        tracing::debug!(
            path = %path.display(),
            version = %library.version,
            "Loaded pattern library"
        );
        Ok(library)
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn noise_patterns(&self) -> &[CompiledPattern] {
        &self.noise
    }

    #[must_use]
    pub fn letterhead_patterns(&self) -> &[CompiledPattern] {
        &self.letterheads
    }

    #[must_use]
    pub fn enacted_markers(&self) -> &[CompiledPattern] {
        &self.enacted
    }

    #[must_use]
    pub fn revoked_markers(&self) -> &[CompiledPattern] {
        &self.revoked
    }

    #[must_use]
    pub fn legal_markers(&self) -> &[CompiledPattern] {
        &self.legal_markers
    }

    /// Find the earliest instrument type phrase in `text`.
    ///
    /// At equal positions the longest phrase wins, so "PERATURAN PEMERINTAH
    /// PENGGANTI UNDANG-UNDANG" is never reported as "PERATURAN PEMERINTAH".
    #[must_use]
    pub fn find_document_type(&self, text: &str) -> Option<&DocumentTypeDef> {
        let regex = self.document_type_regex.as_ref()?;
        let caps = regex.captures(text)?;
        let index = caps.iter().skip(1).position(|group| group.is_some())?;
        self.document_types.get(index)
    }
}

fn compile_all(patterns: &[NamedPattern]) -> Result<Vec<CompiledPattern>> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(&p.pattern)
                .multi_line(true)
                .build()
                .map(|regex| CompiledPattern {
                    name: p.name.clone(),
                    regex,
                })
                .map_err(|source| IngestError::InvalidPattern {
                    name: p.name.clone(),
                    source,
                })
        })
        .collect()
}

/// One capture group per vocabulary entry, in vocabulary order.
fn build_type_regex(types: &[DocumentTypeDef]) -> Result<Option<Regex>> {
    if types.is_empty() {
        return Ok(None);
    }

    let alternatives: Vec<String> = types
        .iter()
        .map(|t| {
            let words: Vec<String> = t
                .phrase
                .split(' ')
                .map(|word| regex::escape(word).replace(r"\-", r"[ \t]*-[ \t]*"))
                .collect();
            format!("({})", words.join(r"\s+"))
        })
        .collect();

    let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|source| IngestError::InvalidPattern {
            name: "document-types".to_string(),
            source,
        })
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
