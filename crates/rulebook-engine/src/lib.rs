//! Validate YAML policy rulebooks and render them as HTML.
//!
//! A rulebook is a directory holding one `INDEX.yaml` and any number of
//! aspect documents. The pipeline runs strictly in order:
//!
//! ```text
//! files ──parse_document──▶ Repository ──validate_cross_refs──▶ Generator ──▶ HTML
//!                               │
//!                               └──export/import──▶ JSON envelope
//! ```
//!
//! Any stage can fail with a [`ParseError`] that knows where in which file
//! the problem is and can render a source excerpt.

pub mod crossref;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod io;
pub mod markup;
pub mod models;
pub mod position;
pub mod reference;
pub mod render;
pub mod repository;
pub mod schema;
pub mod serializer;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use crossref::validate_cross_refs;
pub use diagnostics::{DiagnosticSink, LogSink, NullSink};
pub use document::parse_document;
pub use error::{ErrorKind, ParseError, Position, RulebookError};
pub use io::{IoError, load_rulebook, scan_yaml_files};
pub use markup::MarkupBuilder;
pub use models::{
    AssessStatement, Aspect, AssessmentLevel, Author, ContextMap, Editing, Index, Level, Logo,
    Obligation, Relation, RelationKind, Until, Validity,
};
pub use reference::{AspectRef, ContextRef, Reference};
pub use render::{
    CmarkRenderer, Format, Generator, MarkdownRenderer, RenderOptions, Template, TemplateParts,
    render_page,
};
pub use repository::{Artifact, Origin, Repository};
pub use schema::{Anchor, FieldPath, SchemaError, Strictness};
pub use serializer::{export, export_json, import};
