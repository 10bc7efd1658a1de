//! Article-aligned chunking with clause splitting.

use std::collections::HashMap;
use std::ops::Range;

use crate::config::{validate_max_article_length, CONTEXT_SEPARATOR, DEFAULT_MAX_ARTICLE_LENGTH};
use crate::error::Result;
use crate::patterns::markers::ARTICLE;
use crate::structure::sections::find_sections;
use crate::structure::{elucidation_start, scan_articles, Article, Chapter, StructureTree};
use crate::types::{Chunk, ChunkSection, DocumentMetadata};

use super::header::{article_location, ContextHeader, ELUCIDATION_LABEL};

/// A chunk before indexing and header injection.
#[derive(Debug, Default)]
struct Draft {
    body: String,
    article_number: Option<String>,
    clause_number: Option<String>,
    chapter: Option<String>,
    explains_article: Option<String>,
    section: ChunkSection,
    location: Option<String>,
}

/// Splits cleaned text into article-aligned chunks.
///
/// An article whose text fits in `max_article_length` characters becomes one
/// chunk. A longer article is split into one chunk per clause; an article
/// without clauses is kept whole however long it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_article_length: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            max_article_length: DEFAULT_MAX_ARTICLE_LENGTH,
        }
    }
}

impl Chunker {
    /// Create a chunker. `max_article_length` must be positive.
    pub fn new(max_article_length: usize) -> Result<Self> {
        validate_max_article_length(max_article_length)?;
        Ok(Self { max_article_length })
    }

    #[must_use]
    pub fn max_article_length(&self) -> usize {
        self.max_article_length
    }

    /// Chunk cleaned text.
    ///
    /// `structure`, when given, supplies the chapter of every article for
    /// the context header. Articles are matched to it by number and
    /// occurrence. Empty input yields no chunks; text without any article
    /// yields a single chunk holding all of it.
    #[must_use]
    pub fn chunk(
        &self,
        document_id: &str,
        cleaned: &str,
        metadata: &DocumentMetadata,
        structure: Option<&StructureTree>,
    ) -> Vec<Chunk> {
        if cleaned.trim().is_empty() {
            return Vec::new();
        }

        if !ARTICLE.is_match(cleaned) {
            tracing::debug!(
                document_id,
                chars = cleaned.chars().count(),
                "No article markers, emitting whole text as one chunk"
            );
            let draft = Draft {
                body: cleaned.trim().to_string(),
                ..Draft::default()
            };
            return finalize(document_id, metadata, vec![draft]);
        }

        let operative_end = elucidation_start(cleaned).unwrap_or(cleaned.len());

        let mut drafts = Vec::new();
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        let articles = scan_articles(cleaned, 0..operative_end, None);
        for article in &articles {
            let occurrence = occurrences.entry(article.number.as_str()).or_insert(0);
            let chapter = structure.and_then(|tree| {
                let found = tree.find_article(&article.number, *occurrence)?;
                tree.chapter_of(found).map(Chapter::label)
            });
            *occurrence += 1;
            self.split_article(article, chapter, &mut drafts);
        }

        if operative_end < cleaned.len() {
            self.split_elucidation(cleaned, operative_end..cleaned.len(), &mut drafts);
        }

        let chunks = finalize(document_id, metadata, drafts);
        tracing::debug!(
            document_id,
            articles = articles.len(),
            chunks = chunks.len(),
            max_article_length = self.max_article_length,
            "Chunked document"
        );
        chunks
    }

    fn split_article(&self, article: &Article, chapter: Option<String>, drafts: &mut Vec<Draft>) {
        let length = article.char_len();
        if length <= self.max_article_length || article.clauses.is_empty() {
            if length > self.max_article_length {
                tracing::debug!(
                    article = %article.number,
                    length,
                    "Oversized article without clauses kept whole"
                );
            }
            drafts.push(Draft {
                body: article.text.clone(),
                article_number: Some(article.number.clone()),
                chapter,
                location: Some(article.label()),
                ..Draft::default()
            });
            return;
        }

        // The lead-in rides on the first clause only while the pair fits.
        let mut lead_in = article.lead_in.as_deref();
        if let (Some(text), Some(first)) = (lead_in, article.clauses.first()) {
            let merged = text.chars().count() + 1 + first.text.chars().count();
            if merged > self.max_article_length {
                drafts.push(Draft {
                    body: text.to_string(),
                    article_number: Some(article.number.clone()),
                    chapter: chapter.clone(),
                    location: Some(article.label()),
                    ..Draft::default()
                });
                lead_in = None;
            }
        }

        for (index, clause) in article.clauses.iter().enumerate() {
            let body = match (lead_in, index) {
                (Some(lead_in), 0) => format!("{lead_in}\n{}", clause.text),
                _ => clause.text.clone(),
            };
            let clause_length = body.chars().count();
            if clause_length > self.max_article_length {
                tracing::debug!(
                    article = %article.number,
                    clause = %clause.number,
                    length = clause_length,
                    "Oversized clause kept whole"
                );
            }
            drafts.push(Draft {
                body,
                article_number: Some(article.number.clone()),
                clause_number: Some(clause.number.clone()),
                chapter: chapter.clone(),
                location: Some(article_location(&article.number, Some(&clause.number))),
                ..Draft::default()
            });
        }
    }

    /// General elucidation first, then one run of chunks per explained
    /// article, each packed by paragraph up to the length bound.
    fn split_elucidation(&self, text: &str, span: Range<usize>, drafts: &mut Vec<Draft>) {
        let sections = find_sections(text, span.clone(), &ARTICLE, &[]);
        let general_end = sections.first().map_or(span.end, |s| s.span.start);

        for body in pack_paragraphs(text[span.start..general_end].trim(), self.max_article_length) {
            drafts.push(Draft {
                body,
                section: ChunkSection::Elucidation,
                location: Some(ELUCIDATION_LABEL.to_string()),
                ..Draft::default()
            });
        }

        for section in &sections {
            let explained = text[section.heading_end..section.span.end].trim();
            let location = format!(
                "{ELUCIDATION_LABEL}{CONTEXT_SEPARATOR}{}",
                article_location(&section.number, None)
            );
            for body in pack_paragraphs(explained, self.max_article_length) {
                drafts.push(Draft {
                    body,
                    explains_article: Some(section.number.clone()),
                    section: ChunkSection::Elucidation,
                    location: Some(location.clone()),
                    ..Draft::default()
                });
            }
        }
    }
}

/// Inject headers and assign positions over the final sequence.
fn finalize(document_id: &str, metadata: &DocumentMetadata, drafts: Vec<Draft>) -> Vec<Chunk> {
    let record = metadata.to_record();
    let total_chunks = drafts.len();

    drafts
        .into_iter()
        .enumerate()
        .map(|(chunk_index, draft)| {
            let mut header = ContextHeader::new(metadata);
            if let Some(chapter) = &draft.chapter {
                header = header.with_chapter(chapter.clone());
            }
            if let Some(location) = &draft.location {
                header = header.with_location(location.clone());
            }

            Chunk {
                document_id: document_id.to_string(),
                text: format!("{}\n{}", header.render(), draft.body),
                chunk_index,
                total_chunks,
                article_number: draft.article_number,
                clause_number: draft.clause_number,
                chapter: draft.chapter,
                explains_article: draft.explains_article,
                section: draft.section,
                metadata: record.clone(),
            }
        })
        .collect()
}

/// Greedily pack paragraphs into pieces of at most `max_chars` characters.
///
/// A paragraph longer than the bound is packed line by line; a single line
/// longer than the bound stands alone.
fn pack_paragraphs(text: &str, max_chars: usize) -> Vec<String> {
    let mut units: Vec<(&str, &str)> = Vec::new();
    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        if paragraph.chars().count() <= max_chars {
            units.push(("\n\n", paragraph));
            continue;
        }
        let mut separator = "\n\n";
        for line in paragraph.lines().map(str::trim).filter(|l| !l.is_empty()) {
            units.push((separator, line));
            separator = "\n";
        }
    }

    let mut packed = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for (separator, unit) in units {
        let unit_len = unit.chars().count();
        if current.is_empty() {
            current.push_str(unit);
            current_len = unit_len;
        } else if current_len + separator.len() + unit_len <= max_chars {
            current.push_str(separator);
            current.push_str(unit);
            current_len += separator.len() + unit_len;
        } else {
            packed.push(std::mem::take(&mut current));
            current.push_str(unit);
            current_len = unit_len;
        }
    }
    if !current.is_empty() {
        packed.push(current);
    }
    packed
}
