//! Marker-delimited span finding shared by every nesting level.

use std::ops::Range;

use regex::Regex;

/// One marker occurrence and the span it governs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// First capture group of the marker (the section number).
    pub number: String,

    /// Second capture group of the marker, when non-empty.
    pub inline_title: Option<String>,

    /// Byte offset where the marker match ends.
    pub heading_end: usize,

    /// From the marker start to the next sibling, the first stop, or the end
    /// of the enclosing span.
    pub span: Range<usize>,
}

/// Find every `marker` occurrence inside `within`.
///
/// A section ends at the next `marker` match, at the first match of any
/// `stops` pattern after its own heading, or at `within.end`, whichever
/// comes first. Byte offsets in the result are relative to `text`.
///
/// `within` must lie on character boundaries and start at a line start or
/// at a line end, which holds for every span produced here.
pub fn find_sections(
    text: &str,
    within: Range<usize>,
    marker: &Regex,
    stops: &[&Regex],
) -> Vec<Section> {
    if within.start >= within.end || within.end > text.len() {
        return Vec::new();
    }
    let region = &text[within.clone()];
    let base = within.start;

    let headings: Vec<(usize, usize, String, Option<String>)> = marker
        .captures_iter(region)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1).map_or("", |m| m.as_str()).to_string();
            let title = caps
                .get(2)
                .map(|m| m.as_str().trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            Some((base + whole.start(), base + whole.end(), number, title))
        })
        .collect();

    let mut sections = Vec::with_capacity(headings.len());
    for (i, (start, heading_end, number, inline_title)) in headings.iter().enumerate() {
        let sibling_end = headings.get(i + 1).map_or(within.end, |next| next.0);
        let end = stops
            .iter()
            .filter_map(|stop| stop.find(&text[*heading_end..sibling_end]))
            .map(|m| heading_end + m.start())
            .min()
            .unwrap_or(sibling_end);

        sections.push(Section {
            number: number.clone(),
            inline_title: inline_title.clone(),
            heading_end: *heading_end,
            span: *start..end,
        });
    }
    sections
}
