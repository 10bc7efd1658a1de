//! Retrieval chunk generation.
//!
//! Chunks follow article boundaries. Every chunk starts with a
//! `[CONTEXT: ...]` line naming the document and the chunk's position in it,
//! so that a chunk retrieved on its own still says where it comes from.

mod engine;
mod header;

pub use engine::Chunker;
pub use header::{article_location, ContextHeader, ELUCIDATION_LABEL};
