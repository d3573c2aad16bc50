//! ted-core: path grammar, resolver, and mutation engine for YAML/JSON trees
//!
//! This crate focuses on a small, well-factored surface:
//! - Dotted-path grammar with `[n]` indexing and a configurable separator
//! - Tri-state resolution (found / not found / invalid) over `serde_json::Value`
//! - Idempotent mutation ops: put, update, append, delete, pop, exists
//! - Best-effort coercion of raw text into typed tree values
//! - Document load/save with format detection, and timestamped backups
//!
pub mod coerce;
pub mod doc;
pub mod edit;
pub mod error;
pub mod path;

// Re-export the editing API
pub use coerce::{RawFormat, ValueType, coerce_value, parse_raw};
pub use doc::{
    DocFormat, backup_file, detect_format, load_document, load_or_empty, parse_document,
    render_document, save_document,
};
pub use edit::{Editor, Resolution, resolve, resolve_mut};
pub use error::EditError;
pub use path::{DEFAULT_SEPARATOR, Segment, parse_path};
