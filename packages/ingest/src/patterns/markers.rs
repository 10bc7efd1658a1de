//! Structural marker patterns for Indonesian statutory instruments.
//!
//! Every heading marker is a whole-line pattern in multi-line mode. The
//! cleaner strips leading and trailing horizontal whitespace from each
//! line, so the patterns only tolerate it rather than depend on it.
//!
//! ```text
//! [title block]          UNDANG-UNDANG REPUBLIK INDONESIA / NOMOR .. TAHUN ..
//! [preamble]             DENGAN RAHMAT TUHAN YANG MAHA ESA / Menimbang / Mengingat
//! MEMUTUSKAN:
//! BAB I                  chapter
//! ├── Pasal 1            article owned by the chapter
//! └── Bagian Kesatu      part
//!     └── Paragraf 1     sub-part
//!         └── Pasal 2    article
//!             ├── (1)    clause
//!             └── (2)
//! PENJELASAN             elucidation
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// `BAB IV` with an optional title on the same line.
///
/// Captures: (1) roman numeral, (2) inline title (possibly empty).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static CHAPTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*BAB[ \t]+([IVXLCDM]+)\b[ \t]*([^\n]*?)[ \t]*$").expect("valid regex")
});

/// `Bagian Kesatu`, `Bagian Kedua Belas` or `Bagian 3`.
///
/// Captures: (1) ordinal, (2) inline title (possibly empty).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*Bagian[ \t]+(Ke[a-z]+(?:[ \t]+(?:Belas|Puluh))?|\d+)\b[ \t]*([^\n]*?)[ \t]*$",
    )
    .expect("valid regex")
});

/// `Paragraf 2`.
///
/// Captures: (1) number with optional letter suffix, (2) inline title.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static SUBPART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Paragraf[ \t]+(\d+[A-Za-z]?)\b[ \t]*([^\n]*?)[ \t]*$")
        .expect("valid regex")
});

/// `Pasal 12` or `Pasal 12A` alone on its line.
///
/// Captures: (1) article number.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static ARTICLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*Pasal[ \t]+(\d+[A-Za-z]?)[ \t]*$").expect("valid regex")
});

/// Article keyword in any of the spacings seen in extracted text
/// (`PASAL 3`, `Pasal   3`, `P a s a l 3`, `Pasal 3 A`).
///
/// Captures: (1) number, (2) optional letter suffix.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static ARTICLE_LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*P[ \t]?A[ \t]?S[ \t]?A[ \t]?L[ \t]+(\d+)[ \t]?([A-Z])?[ \t]*$")
        .expect("valid regex")
});

/// Clause marker `(1)` or `(1a)` at the start of a line.
///
/// Captures: (1) clause number.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\((\d+[a-z]?)\)").expect("valid regex")
});

/// Elucidation heading.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static ELUCIDATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*PENJELASAN[ \t]*$").expect("valid regex")
});

/// `MEMUTUSKAN:` decision formula closing the preamble.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub static DECISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*MEMUTUSKAN[ \t]*:").expect("valid regex")
});

/// Preamble opening phrases, in the order they are tried.
#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
pub static PREAMBLE_OPENERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?mi)^[ \t]*DENGAN[ \t]+RAHMAT[ \t]+TUHAN[ \t]+YANG[ \t]+MAHA[ \t]+ESA",
        r"(?m)^[ \t]*Menimbang\b",
        r"(?m)^[ \t]*Mengingat\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Heading markers that end an article span besides the next article.
pub fn article_stops() -> [&'static Regex; 3] {
    [&*CHAPTER, &*PART, &*SUBPART]
}

/// Whether a line is any structural heading.
pub fn is_heading_line(line: &str) -> bool {
    CHAPTER.is_match(line)
        || PART.is_match(line)
        || SUBPART.is_match(line)
        || ARTICLE.is_match(line)
        || ELUCIDATION.is_match(line)
}
