//! Noise removal and normalization of extracted legal text.
//!
//! Cleaning runs in five passes over the raw text:
//!
//! 1. Noise removal: every noise pattern of the [`PatternLibrary`] is
//!    deleted (letterheads, certified-copy stamps, page numbers).
//! 2. Whitespace: runs of horizontal whitespace collapse to one space and
//!    every line is trimmed.
//! 3. Article markers: `PASAL 3`, `P a s a l 3` and friends become `Pasal 3`.
//! 4. Blank lines: three or more consecutive newlines collapse to one
//!    blank line.
//! 5. Trim.
//!
//! Line endings, form feeds and Unicode composition are normalized before
//! the first pass so that the multi-line noise patterns see `\n` only.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::patterns::markers::ARTICLE_LOOSE;
use crate::patterns::{CompiledPattern, PatternLibrary};

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static BLANK_LINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Diagnostic counters of a cleaning run. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// Characters in the raw input.
    pub input_chars: usize,

    /// Characters in the cleaned output.
    pub output_chars: usize,

    /// Number of noise pattern matches removed.
    pub removed_matches: usize,

    /// Characters removed by noise patterns.
    pub removed_chars: usize,
}

/// Text cleaner backed by a shared pattern library.
#[derive(Debug, Clone, Copy)]
pub struct Cleaner<'a> {
    library: &'a PatternLibrary,
}

impl Default for Cleaner<'static> {
    fn default() -> Self {
        Self::new(PatternLibrary::builtin())
    }
}

impl<'a> Cleaner<'a> {
    /// Create a cleaner using `library` for noise patterns.
    #[must_use]
    pub fn new(library: &'a PatternLibrary) -> Self {
        Self { library }
    }

    /// Clean raw extracted text. Empty input yields empty output.
    #[must_use]
    pub fn clean(&self, raw: &str) -> String {
        self.clean_with_report(raw).0
    }

    /// Clean raw extracted text and return diagnostic counters.
    #[must_use]
    pub fn clean_with_report(&self, raw: &str) -> (String, CleanReport) {
        let mut report = CleanReport {
            input_chars: raw.chars().count(),
            ..CleanReport::default()
        };
        if raw.is_empty() {
            return (String::new(), report);
        }

        let text = normalize_characters(raw);
        let (text, matches, chars) = remove_all(&text, self.library.noise_patterns());
        report.removed_matches = matches;
        report.removed_chars = chars;

        let text = normalize_whitespace(&text);
        let text = normalize_article_markers(&text);
        let text = collapse_blank_lines(&text);
        let cleaned = text.trim().to_string();

        report.output_chars = cleaned.chars().count();
        tracing::debug!(
            library = %self.library.version(),
            removed_matches = report.removed_matches,
            removed_chars = report.removed_chars,
            input_chars = report.input_chars,
            output_chars = report.output_chars,
            "Cleaned document text"
        );

        (cleaned, report)
    }

    /// Remove institutional letterheads with the aggressive pattern set.
    ///
    /// Not part of [`clean`](Self::clean): these patterns can also match
    /// body lines that mention the same institutions, so callers opt in
    /// for documents with unusually persistent headers.
    #[must_use]
    pub fn strip_letterheads(&self, cleaned: &str) -> String {
        let (text, matches, chars) = remove_all(cleaned, self.library.letterhead_patterns());
        tracing::debug!(
            removed_matches = matches,
            removed_chars = chars,
            "Stripped letterheads"
        );
        collapse_blank_lines(&text).trim().to_string()
    }
}

/// NFC, LF line endings, page breaks as newlines, no-break spaces as spaces.
fn normalize_characters(raw: &str) -> String {
    raw.nfc()
        .collect::<String>()
        .replace("\r\n", "\n")
        .replace(['\r', '\u{000C}'], "\n")
        .replace(['\u{00A0}', '\u{202F}'], " ")
}

fn remove_all(text: &str, patterns: &[CompiledPattern]) -> (String, usize, usize) {
    let mut current = text.to_string();
    let mut matches = 0usize;
    let mut chars = 0usize;

    for pattern in patterns {
        let mut hits = 0usize;
        let mut removed = 0usize;
        for m in pattern.regex.find_iter(&current) {
            hits += 1;
            removed += m.as_str().chars().count();
        }
        if hits == 0 {
            continue;
        }
        tracing::trace!(pattern = %pattern.name, hits, "Removing noise");
        current = pattern.regex.replace_all(&current, "").into_owned();
        matches += hits;
        chars += removed;
    }

    (current, matches, chars)
}

fn normalize_whitespace(text: &str) -> String {
    text.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_article_markers(text: &str) -> String {
    ARTICLE_LOOSE
        .replace_all(text, |caps: &Captures<'_>| {
            let suffix = caps.get(2).map_or(String::new(), |m| m.as_str().to_uppercase());
            format!("Pasal {}{}", &caps[1], suffix)
        })
        .into_owned()
}

fn collapse_blank_lines(text: &str) -> String {
    BLANK_LINE_RUNS.replace_all(text, "\n\n").into_owned()
}
