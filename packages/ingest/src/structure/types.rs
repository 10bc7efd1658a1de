//! Structure tree node types.
//!
//! Nodes are built once by the parser and read-only afterwards. Every node
//! keeps its byte `span` into the cleaned text it was parsed from.

use std::ops::Range;

use serde::Serialize;

/// Index of a chapter in [`StructureTree::chapters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ChapterId(pub usize);

/// Numbered clause (ayat) of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clause {
    /// Clause number without parentheses ("1", "2a").
    pub number: String,

    /// Clause text including its `(n)` marker.
    pub text: String,

    pub span: Range<usize>,
}

/// Article (pasal).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    /// Article number ("12", "12A").
    pub number: String,

    /// Article text without its `Pasal N` heading.
    pub text: String,

    /// Text before the first clause, when the article has clauses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_in: Option<String>,

    pub clauses: Vec<Clause>,

    /// Enclosing chapter, for lookup only.
    pub chapter: Option<ChapterId>,

    pub span: Range<usize>,
}

impl Article {
    /// `"Pasal 12A"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("Pasal {}", self.number)
    }

    /// Article text length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Sub-part (paragraf) of a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubPart {
    pub number: String,
    pub title: Option<String>,
    pub text: String,
    pub articles: Vec<Article>,
    pub span: Range<usize>,
}

/// Part (bagian) of a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    /// Ordinal as written ("Kesatu", "Kedua Belas").
    pub number: String,
    pub title: Option<String>,
    pub subparts: Vec<SubPart>,

    /// Articles outside any sub-part.
    pub articles: Vec<Article>,
    pub span: Range<usize>,
}

/// Chapter (bab).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chapter {
    /// Roman numeral ("IV").
    pub number: String,
    pub title: Option<String>,

    /// Chapter text without its `BAB` heading.
    pub text: String,
    pub parts: Vec<Part>,

    /// Articles outside any part.
    pub articles: Vec<Article>,
    pub span: Range<usize>,
}

impl Chapter {
    /// `"BAB I KETENTUAN UMUM"`, or `"BAB I"` without a title.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.title {
            Some(title) => format!("BAB {} {}", self.number, title),
            None => format!("BAB {}", self.number),
        }
    }

    /// Every article of the chapter in document order, at any depth.
    #[must_use]
    pub fn all_articles(&self) -> Vec<&Article> {
        let mut articles: Vec<&Article> = self.articles.iter().collect();
        for part in &self.parts {
            articles.extend(part.articles.iter());
            for subpart in &part.subparts {
                articles.extend(subpart.articles.iter());
            }
        }
        articles.sort_by_key(|a| a.span.start);
        articles
    }
}

/// Hierarchical structure of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructureTree {
    pub preamble: Option<String>,
    pub chapters: Vec<Chapter>,

    /// Every article of the operative body in document order.
    pub articles: Vec<Article>,
    pub elucidation: Option<String>,
}

impl StructureTree {
    /// Whether nothing at all was recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preamble.is_none()
            && self.chapters.is_empty()
            && self.articles.is_empty()
            && self.elucidation.is_none()
    }

    #[must_use]
    pub fn chapter(&self, id: ChapterId) -> Option<&Chapter> {
        self.chapters.get(id.0)
    }

    /// Enclosing chapter of an article.
    #[must_use]
    pub fn chapter_of(&self, article: &Article) -> Option<&Chapter> {
        article.chapter.and_then(|id| self.chapter(id))
    }

    /// The `occurrence`-th (zero-based) article numbered `number`.
    ///
    /// Amending instruments repeat article numbers, so a number alone does
    /// not identify an article.
    #[must_use]
    pub fn find_article(&self, number: &str, occurrence: usize) -> Option<&Article> {
        self.articles
            .iter()
            .filter(|a| a.number == number)
            .nth(occurrence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(number: &str, start: usize, chapter: Option<usize>) -> Article {
        Article {
            number: number.to_string(),
            text: format!("isi {number}"),
            lead_in: None,
            clauses: Vec::new(),
            chapter: chapter.map(ChapterId),
            span: start..start + 10,
        }
    }

    fn chapter(number: &str, title: Option<&str>) -> Chapter {
        Chapter {
            number: number.to_string(),
            title: title.map(str::to_string),
            text: String::new(),
            parts: Vec::new(),
            articles: Vec::new(),
            span: 0..0,
        }
    }

    #[test]
    fn test_chapter_label() {
        assert_eq!(
            chapter("I", Some("KETENTUAN UMUM")).label(),
            "BAB I KETENTUAN UMUM"
        );
        assert_eq!(chapter("XII", None).label(), "BAB XII");
    }

    #[test]
    fn test_find_article_by_occurrence() {
        let tree = StructureTree {
            chapters: vec![chapter("I", None), chapter("II", None)],
            articles: vec![
                article("1", 0, Some(0)),
                article("2", 10, Some(0)),
                article("1", 20, Some(1)),
            ],
            ..StructureTree::default()
        };

        let first = tree.find_article("1", 0).unwrap();
        assert_eq!(first.span.start, 0);
        let second = tree.find_article("1", 1).unwrap();
        assert_eq!(second.span.start, 20);
        assert_eq!(tree.chapter_of(second).unwrap().number, "II");
        assert!(tree.find_article("1", 2).is_none());
        assert!(tree.find_article("9", 0).is_none());
    }

    #[test]
    fn test_chapter_of_without_chapter() {
        let tree = StructureTree {
            articles: vec![article("1", 0, None)],
            ..StructureTree::default()
        };
        assert!(tree.chapter_of(&tree.articles[0]).is_none());
        assert!(tree.chapter(ChapterId(0)).is_none());
    }

    #[test]
    fn test_all_articles_in_document_order() {
        let mut ch = chapter("I", None);
        ch.articles.push(article("1", 0, Some(0)));
        ch.parts.push(Part {
            number: "Kesatu".to_string(),
            title: None,
            subparts: vec![SubPart {
                number: "1".to_string(),
                title: None,
                text: String::new(),
                articles: vec![article("3", 30, Some(0))],
                span: 25..40,
            }],
            articles: vec![article("2", 15, Some(0))],
            span: 12..40,
        });
        let numbers: Vec<_> = ch.all_articles().iter().map(|a| a.number.as_str()).collect();
        assert_eq!(numbers, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_default_tree_is_empty() {
        assert!(StructureTree::default().is_empty());
    }
}
