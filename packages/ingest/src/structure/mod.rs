//! Hierarchical structure of statutory instruments.
//!
//! The parser walks the cleaned text level by level. Every level (chapter,
//! part, sub-part, article, clause) uses the same span rule from
//! [`sections`]: a section runs from its marker to the next sibling marker
//! or the end of its enclosing span.

mod parser;
pub mod sections;
mod types;

pub(crate) use parser::{elucidation_start, scan_articles};
pub use parser::StructureParser;
pub use types::{Article, Chapter, ChapterId, Clause, Part, StructureTree, SubPart};
