//! Marker-driven structure parser.

use std::ops::Range;

use crate::config::PREAMBLE_MAX_SPAN;
use crate::patterns::markers::{
    article_stops, is_heading_line, ARTICLE, CHAPTER, CLAUSE, DECISION, ELUCIDATION, PART,
    PREAMBLE_OPENERS, SUBPART,
};

use super::sections::{find_sections, Section};
use super::types::{Article, Chapter, ChapterId, Clause, Part, StructureTree, SubPart};

/// Builds a [`StructureTree`] from cleaned text.
///
/// Parsing never fails: unrecognized or malformed input yields an empty or
/// partially populated tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureParser;

impl StructureParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse cleaned text into a structure tree.
    ///
    /// # Examples
    /// ```
    /// use peraturan_ingest::structure::StructureParser;
    ///
    /// let tree = StructureParser::new().parse("BAB I\nUMUM\nPasal 1\n(1) Satu.\n(2) Dua.");
    /// assert_eq!(tree.chapters.len(), 1);
    /// assert_eq!(tree.articles[0].clauses.len(), 2);
    /// ```
    #[must_use]
    pub fn parse(&self, cleaned: &str) -> StructureTree {
        let text = cleaned;
        let elucidation_at = elucidation_start(text);
        let body_end = elucidation_at.unwrap_or(text.len());
        let preamble_span = locate_preamble(text)
            .filter(|span| span.start < body_end)
            .map(|span| span.start..span.end.min(body_end));
        let body_start = preamble_span.as_ref().map_or(0, |span| span.end);

        let elucidation = elucidation_at.and_then(|start| non_empty(&text[start..]));
        let body = body_start..body_end;

        let chapters = parse_chapters(text, body.clone());
        let mut articles = scan_articles(text, body, None);
        for article in &mut articles {
            article.chapter = chapters
                .iter()
                .position(|c| c.span.contains(&article.span.start))
                .map(ChapterId);
        }

        let tree = StructureTree {
            preamble: preamble_span.and_then(|span| non_empty(&text[span])),
            chapters,
            articles,
            elucidation,
        };
        tracing::debug!(
            chapters = tree.chapters.len(),
            articles = tree.articles.len(),
            preamble = tree.preamble.is_some(),
            elucidation = tree.elucidation.is_some(),
            "Parsed document structure"
        );
        tree
    }
}

/// Byte offset of the elucidation heading.
///
/// The search starts after the first article marker so that a `PENJELASAN`
/// line before the operative body is never taken as the boundary. Both the
/// parser and the chunker cut the body here.
pub(crate) fn elucidation_start(text: &str) -> Option<usize> {
    let from = ARTICLE.find(text).map_or(0, |m| m.end());
    ELUCIDATION.find_at(text, from).map(|m| m.start())
}

/// Scan `within` for articles and their clauses.
///
/// Articles end at the next article or at any chapter, part or sub-part
/// heading. `chapter` is stamped on every article found.
pub(crate) fn scan_articles(
    text: &str,
    within: Range<usize>,
    chapter: Option<ChapterId>,
) -> Vec<Article> {
    find_sections(text, within, &ARTICLE, &article_stops())
        .into_iter()
        .map(|section| build_article(text, &section, chapter))
        .collect()
}

fn build_article(text: &str, section: &Section, chapter: Option<ChapterId>) -> Article {
    let body = section.heading_end..section.span.end;
    let clauses: Vec<Clause> = find_sections(text, body.clone(), &CLAUSE, &[])
        .into_iter()
        .map(|clause| Clause {
            number: clause.number,
            text: text[clause.span.clone()].trim().to_string(),
            span: clause.span,
        })
        .collect();
    let lead_in = clauses
        .first()
        .and_then(|first| non_empty(&text[body.start..first.span.start]));

    Article {
        number: section.number.clone(),
        text: text[body].trim().to_string(),
        lead_in,
        clauses,
        chapter,
        span: section.span.clone(),
    }
}

fn parse_chapters(text: &str, body: Range<usize>) -> Vec<Chapter> {
    find_sections(text, body, &CHAPTER, &[])
        .into_iter()
        .enumerate()
        .map(|(index, section)| {
            let id = ChapterId(index);
            let inner = section.heading_end..section.span.end;
            let parts = parse_parts(text, inner.clone(), id);
            let direct_end = parts.first().map_or(inner.end, |p| p.span.start);

            Chapter {
                title: section_title(text, &section),
                text: text[inner.clone()].trim().to_string(),
                articles: scan_articles(text, inner.start..direct_end, Some(id)),
                parts,
                number: section.number,
                span: section.span,
            }
        })
        .collect()
}

fn parse_parts(text: &str, chapter: Range<usize>, id: ChapterId) -> Vec<Part> {
    find_sections(text, chapter, &PART, &[])
        .into_iter()
        .map(|section| {
            let inner = section.heading_end..section.span.end;
            let subparts = parse_subparts(text, inner.clone(), id);
            let direct_end = subparts.first().map_or(inner.end, |s| s.span.start);

            Part {
                title: section_title(text, &section),
                articles: scan_articles(text, inner.start..direct_end, Some(id)),
                subparts,
                number: section.number,
                span: section.span,
            }
        })
        .collect()
}

fn parse_subparts(text: &str, part: Range<usize>, id: ChapterId) -> Vec<SubPart> {
    find_sections(text, part, &SUBPART, &[])
        .into_iter()
        .map(|section| {
            let inner = section.heading_end..section.span.end;
            SubPart {
                title: section_title(text, &section),
                text: text[inner.clone()].trim().to_string(),
                articles: scan_articles(text, inner, Some(id)),
                number: section.number,
                span: section.span,
            }
        })
        .collect()
}

/// Inline title, or else the first non-empty line after the heading unless
/// that line is itself a heading.
fn section_title(text: &str, section: &Section) -> Option<String> {
    if let Some(title) = &section.inline_title {
        return Some(title.clone());
    }
    let line = text[section.heading_end..section.span.end]
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())?;
    (!is_heading_line(line)).then(|| line.to_string())
}

/// The earliest opener, up to the decision formula or the first chapter or
/// article, whichever comes first.
///
/// An opener after the first chapter or article heading belongs to the body
/// or the elucidation, so the document has no preamble.
fn locate_preamble(text: &str) -> Option<Range<usize>> {
    let opener = PREAMBLE_OPENERS
        .iter()
        .filter_map(|re| re.find(text))
        .min_by_key(|m| m.start())?;
    let first_heading = [&*CHAPTER, &*ARTICLE]
        .iter()
        .filter_map(|re| re.find(text))
        .map(|m| m.start())
        .min();
    if first_heading.is_some_and(|heading| heading < opener.start()) {
        tracing::debug!(
            opener = opener.start(),
            "Preamble opener found after the first heading, ignoring it"
        );
        return None;
    }
    let start = opener.start();

    let end = [&*DECISION, &*CHAPTER, &*ARTICLE]
        .iter()
        .filter_map(|re| re.find_at(text, opener.end()))
        .map(|m| m.start())
        .min();

    match end {
        Some(end) => Some(start..end),
        None => {
            let end = fallback_preamble_end(text, start);
            tracing::debug!(
                start,
                end,
                max_chars = PREAMBLE_MAX_SPAN,
                "No preamble end marker found, using fallback span"
            );
            Some(start..end)
        }
    }
}

/// `PREAMBLE_MAX_SPAN` characters after `start`, extended to the end of
/// that line.
fn fallback_preamble_end(text: &str, start: usize) -> usize {
    let Some((offset, _)) = text[start..].char_indices().nth(PREAMBLE_MAX_SPAN) else {
        return text.len();
    };
    let limit = start + offset;
    text[limit..]
        .find('\n')
        .map_or(text.len(), |newline| limit + newline + 1)
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NESTED: &str = "\
UNDANG-UNDANG REPUBLIK INDONESIA
NOMOR 1 TAHUN 2024
TENTANG
CONTOH

DENGAN RAHMAT TUHAN YANG MAHA ESA
Menimbang: a. bahwa contoh diperlukan;
Mengingat: Pasal 5 ayat (1) Undang-Undang Dasar;
MEMUTUSKAN:
Menetapkan: UNDANG-UNDANG TENTANG CONTOH.
BAB I
KETENTUAN UMUM
Pasal 1
Dalam Undang-Undang ini yang dimaksud dengan contoh adalah contoh.
BAB II
PELAKSANAAN
Bagian Kesatu
Umum
Pasal 2
(1) Pelaksanaan dilakukan oleh Pemerintah.
(2) Ketentuan lebih lanjut diatur dengan Peraturan Pemerintah.
Bagian Kedua
Perizinan
Paragraf 1
Izin Usaha
Pasal 3
Izin diberikan oleh Menteri.
Paragraf 2
Izin Lingkungan
Pasal 4
Izin lingkungan wajib dimiliki.
PENJELASAN
ATAS
UNDANG-UNDANG NOMOR 1 TAHUN 2024
Pasal 1
Cukup jelas.";

    fn parse(text: &str) -> StructureTree {
        StructureParser::new().parse(text)
    }

    #[test]
    fn test_parse_empty() {
        let tree = parse("");
        assert!(tree.is_empty());
        assert_eq!(tree, StructureTree::default());
    }

    #[test]
    fn test_parse_prose_without_markers() {
        let tree = parse("Catatan rapat tanpa struktur apa pun.");
        assert!(tree.chapters.is_empty());
        assert!(tree.articles.is_empty());
        assert!(tree.preamble.is_none());
        assert!(tree.elucidation.is_none());
    }

    #[test]
    fn test_parse_preamble() {
        let tree = parse(NESTED);
        let preamble = tree.preamble.unwrap();
        assert!(preamble.starts_with("DENGAN RAHMAT TUHAN YANG MAHA ESA"));
        assert!(preamble.ends_with("Undang-Undang Dasar;"));
        assert!(!preamble.contains("MEMUTUSKAN"));
    }

    #[test]
    fn test_parse_chapters_and_titles() {
        let tree = parse(NESTED);
        assert_eq!(tree.chapters.len(), 2);
        assert_eq!(tree.chapters[0].label(), "BAB I KETENTUAN UMUM");
        assert_eq!(tree.chapters[1].label(), "BAB II PELAKSANAAN");
        assert_eq!(tree.chapters[0].articles.len(), 1);
        assert!(tree.chapters[0].parts.is_empty());
    }

    #[test]
    fn test_parse_parts_and_subparts() {
        let tree = parse(NESTED);
        let chapter = &tree.chapters[1];
        assert!(chapter.articles.is_empty());
        assert_eq!(chapter.parts.len(), 2);

        let first = &chapter.parts[0];
        assert_eq!(first.number, "Kesatu");
        assert_eq!(first.title.as_deref(), Some("Umum"));
        assert_eq!(first.articles.len(), 1);
        assert_eq!(first.articles[0].number, "2");

        let second = &chapter.parts[1];
        assert_eq!(second.number, "Kedua");
        assert!(second.articles.is_empty());
        assert_eq!(second.subparts.len(), 2);
        assert_eq!(second.subparts[0].title.as_deref(), Some("Izin Usaha"));
        assert_eq!(second.subparts[1].articles[0].number, "4");

        let numbers: Vec<_> = chapter.all_articles().iter().map(|a| a.number.clone()).collect();
        assert_eq!(numbers, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_parse_articles_and_clauses() {
        let tree = parse(NESTED);
        let numbers: Vec<_> = tree.articles.iter().map(|a| a.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "3", "4"]);

        let article = &tree.articles[1];
        assert_eq!(article.clauses.len(), 2);
        assert_eq!(article.clauses[0].number, "1");
        assert_eq!(
            article.clauses[0].text,
            "(1) Pelaksanaan dilakukan oleh Pemerintah."
        );
        assert!(article.lead_in.is_none());
        assert!(!article.text.contains("Bagian Kedua"));
    }

    #[test]
    fn test_parse_article_text_excludes_headings() {
        let tree = parse(NESTED);
        assert_eq!(tree.articles[2].text, "Izin diberikan oleh Menteri.");
        assert_eq!(
            tree.articles[0].text,
            "Dalam Undang-Undang ini yang dimaksud dengan contoh adalah contoh."
        );
    }

    #[test]
    fn test_parse_chapter_back_references() {
        let tree = parse(NESTED);
        let chapters: Vec<_> = tree
            .articles
            .iter()
            .map(|a| tree.chapter_of(a).map(|c| c.number.clone()))
            .collect();
        assert_eq!(
            chapters,
            vec![
                Some("I".to_string()),
                Some("II".to_string()),
                Some("II".to_string()),
                Some("II".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_elucidation_is_not_body() {
        let tree = parse(NESTED);
        let elucidation = tree.elucidation.unwrap();
        assert!(elucidation.starts_with("PENJELASAN"));
        assert!(elucidation.ends_with("Cukup jelas."));
        assert_eq!(tree.articles.len(), 4);
        assert!(!tree.chapters[1].text.contains("PENJELASAN"));
    }

    #[test]
    fn test_parse_articles_without_chapters() {
        let tree = parse("Pasal 1\nSatu.\nPasal 2\n(1) Dua.\n(1a) Sisipan.");
        assert!(tree.chapters.is_empty());
        assert_eq!(tree.articles.len(), 2);
        assert!(tree.articles[0].chapter.is_none());
        let clauses: Vec<_> = tree.articles[1].clauses.iter().map(|c| c.number.as_str()).collect();
        assert_eq!(clauses, vec!["1", "1a"]);
    }

    #[test]
    fn test_parse_duplicate_article_numbers() {
        let tree = parse("BAB I\nPasal 5\nLama.\nBAB II\nPasal 5\nBaru.");
        assert_eq!(tree.articles.len(), 2);
        assert_eq!(tree.find_article("5", 1).unwrap().text, "Baru.");
        assert_eq!(
            tree.chapter_of(tree.find_article("5", 1).unwrap()).unwrap().number,
            "II"
        );
    }

    #[test]
    fn test_parse_lead_in() {
        let tree = parse("Pasal 7\nDengan ketentuan:\n(1) satu;\n(2) dua.");
        let article = &tree.articles[0];
        assert_eq!(article.lead_in.as_deref(), Some("Dengan ketentuan:"));
        assert_eq!(article.clauses.len(), 2);
    }

    #[test]
    fn test_parse_chapter_without_title() {
        let tree = parse("BAB III\nPasal 9\nIsi.");
        assert_eq!(tree.chapters[0].title, None);
        assert_eq!(tree.chapters[0].label(), "BAB III");
    }

    #[test]
    fn test_preamble_fallback_span() {
        let filler = "bahwa sesuatu perlu diatur;\n".repeat(400);
        let text = format!("Menimbang:\n{filler}");
        let span = locate_preamble(&text).unwrap();
        assert_eq!(span.start, 0);
        assert!(span.end < text.len());
        assert!(text[..span.end].ends_with('\n'));
        assert!(text[..span.end].chars().count() >= PREAMBLE_MAX_SPAN);
    }

    #[test]
    fn test_opener_inside_elucidation_is_not_a_preamble() {
        let text = "Pasal 1\nIsi satu.\nPasal 2\nIsi dua.\nPENJELASAN\nI. UMUM\n\
                    Mengingat pentingnya pelindungan data.\nPasal 1\nCukup jelas.";
        let tree = parse(text);
        assert!(tree.preamble.is_none());
        let articles: Vec<_> = tree
            .articles
            .iter()
            .map(|a| (a.number.as_str(), a.text.as_str()))
            .collect();
        assert_eq!(articles, vec![("1", "Isi satu."), ("2", "Isi dua.")]);
        assert!(tree.elucidation.unwrap().contains("Mengingat pentingnya"));
    }

    #[test]
    fn test_earliest_opener_starts_preamble() {
        let text = "Menimbang: bahwa perlu.\nDENGAN RAHMAT TUHAN YANG MAHA ESA\nMEMUTUSKAN:\nPasal 1\nIsi.";
        let span = locate_preamble(text).unwrap();
        assert_eq!(span.start, 0);
        assert!(text[span].ends_with("MAHA ESA\n"));
    }

    #[test]
    fn test_elucidation_start_skips_heading_before_body() {
        let text = "PENJELASAN\nPasal 1\nIsi.\nPENJELASAN\nPasal 1\nCukup jelas.";
        let start = elucidation_start(text).unwrap();
        assert_eq!(start, text.rfind("PENJELASAN").unwrap());
        assert_eq!(elucidation_start("Pasal 1\nIsi."), None);
        assert_eq!(elucidation_start("Catatan\nPENJELASAN\nUmum."), Some(8));
    }

    #[test]
    fn test_preamble_ends_at_first_article_without_decision() {
        let tree = parse("Menimbang: bahwa perlu.\nPasal 1\nIsi.");
        assert_eq!(tree.preamble.as_deref(), Some("Menimbang: bahwa perlu."));
        assert_eq!(tree.articles.len(), 1);
    }
}
