//! Pattern tables shared by every pipeline stage.
//!
//! Two kinds of patterns live here:
//!
//! - [`markers`]: the fixed structural grammar of Indonesian statutory
//!   instruments (BAB, Bagian, Paragraf, Pasal, ayat, PENJELASAN).
//! - [`library`]: versioned, replaceable data (boilerplate, type
//!   vocabulary, status phrases) loaded from YAML or the built-in table.

pub mod library;
pub mod markers;

pub use library::{
    CompiledPattern, DocumentTypeDef, DocumentTypeEntry, NamedPattern, PatternLibrary,
    PatternLibrarySource, BUILTIN_VERSION,
};
