//! Peraturan Ingest - Turn extracted Indonesian legislation into retrieval chunks.
//!
//! This crate takes the raw text of an Indonesian statutory instrument
//! (undang-undang, peraturan pemerintah, peraturan menteri, ...) and produces
//! clean text, document metadata, a chapter/part/article/clause tree and a
//! sequence of article-aligned chunks carrying a context header.
//!
//! # Example
//!
//! ```
//! use peraturan_ingest::Pipeline;
//!
//! let raw = "PERATURAN PEMERINTAH REPUBLIK INDONESIA\nNOMOR 5 TAHUN 2021\n\
//!            TENTANG\nPERIZINAN BERUSAHA\n\nPasal 1\nIzin diberikan oleh Menteri.";
//! let document = Pipeline::default().process("pp-5-2021", raw);
//!
//! assert_eq!(document.metadata.doc_type.as_ref().unwrap().abbrev, "PP");
//! assert!(document.chunks[0].text.starts_with("[CONTEXT: PP - NO 5 - TAHUN 2021"));
//! ```
//!
//! # Architecture
//!
//! The pipeline is organized into several modules:
//!
//! - [`config`]: Configuration constants, validation and [`PipelineConfig`]
//! - [`error`]: Error types and Result alias
//! - [`patterns`]: Structural markers and the versioned pattern library
//! - [`cleaner`]: Noise removal and normalization
//! - [`metadata`]: Document type, number, year, topic and status extraction
//! - [`structure`]: Hierarchical structure parsing
//! - [`chunker`]: Article-aligned chunking with context headers
//! - [`types`]: Metadata and chunk types
//! - [`pipeline`]: All stages composed for one document
//! - [`cli`]: Command-line interface

pub mod chunker;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod patterns;
pub mod pipeline;
pub mod structure;
pub mod types;

// Re-export commonly used items
pub use chunker::Chunker;
pub use cleaner::{CleanReport, Cleaner};
pub use config::PipelineConfig;
pub use error::{IngestError, Result};
pub use metadata::MetadataExtractor;
pub use patterns::PatternLibrary;
pub use pipeline::{Pipeline, ProcessedDocument};
pub use structure::{StructureParser, StructureTree};
pub use types::{Chunk, ChunkSection, DocumentMetadata, DocumentStatus, DocumentType, MetadataRecord};
