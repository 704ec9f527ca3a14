//! In-memory store for one rulebook: the index and its aspects.

use rulebook_syntax::YamlTree;

use crate::error::{ErrorKind, ParseError, RulebookError};
use crate::models::{Aspect, Index};
use crate::position::resolve;
use crate::schema::FieldPath;

/// Where a validated document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub filename: String,
    pub source: String,
    pub tree: YamlTree,
}

impl Origin {
    /// An error pointing at `path` in this document, or at its closest
    /// ancestor the source has.
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>, path: &FieldPath) -> ParseError {
        ParseError::new(kind, message)
            .with_file(&self.filename)
            .with_source(&self.source)
            .with_position(resolve(&self.source, Some(&self.tree), path))
    }
}

/// A validated value, plus its source when it was parsed from one.
///
/// Imported documents have no origin; errors about them carry no position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact<T> {
    pub value: T,
    pub origin: Option<Origin>,
}

impl<T> Artifact<T> {
    pub fn new(value: T, origin: Option<Origin>) -> Self {
        Self { value, origin }
    }

    /// An error about this artifact, placed in its source if it has one.
    pub fn error(&self, kind: ErrorKind, message: impl Into<String>, path: &FieldPath) -> ParseError {
        match &self.origin {
            Some(origin) => origin.error(kind, message, path),
            None => ParseError::new(kind, message),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Repository {
    index: Option<Artifact<Index>>,
    aspects: Vec<Artifact<Aspect>>,
}

impl Repository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a validated value with the document it came from, re-parsing
    /// the source into a syntax tree for later diagnostics.
    pub fn create_artifact<T>(value: T, filename: &str, source: &str) -> Artifact<T> {
        Artifact::new(
            value,
            Some(Origin {
                filename: filename.to_string(),
                source: source.to_string(),
                tree: YamlTree::parse(source),
            }),
        )
    }

    /// Set the index, replacing any earlier one.
    pub fn set_index(&mut self, index: Artifact<Index>) {
        self.index = Some(index);
    }

    pub fn clear_index(&mut self) {
        self.index = None;
    }

    pub fn index(&self) -> Option<&Artifact<Index>> {
        self.index.as_ref()
    }

    /// The index, for stages that cannot run without one.
    pub fn require_index(&self) -> Result<&Artifact<Index>, RulebookError> {
        self.index.as_ref().ok_or(RulebookError::IndexNotLoaded)
    }

    /// Append an aspect. Insertion order is kept.
    pub fn add_aspect(&mut self, aspect: Artifact<Aspect>) {
        self.aspects.push(aspect);
    }

    /// Append an aspect unless its id is already taken.
    pub fn add_unique_aspect(&mut self, aspect: Artifact<Aspect>) -> Result<(), ParseError> {
        if let Some(existing) = self.find_aspect_by_id(&aspect.value.id) {
            let first = existing
                .origin
                .as_ref()
                .map_or_else(String::new, |origin| format!(" in `{}`", origin.filename));
            return Err(aspect.error(
                ErrorKind::Schema,
                format!("duplicate aspect Id `{}`, already defined{first}", aspect.value.id),
                &FieldPath::root().key("Id"),
            ));
        }
        self.add_aspect(aspect);
        Ok(())
    }

    pub fn aspects(&self) -> &[Artifact<Aspect>] {
        &self.aspects
    }

    /// First aspect with this id.
    pub fn find_aspect_by_id(&self, id: &str) -> Option<&Artifact<Aspect>> {
        self.aspects.iter().find(|aspect| aspect.value.id == id)
    }

    pub fn clear_aspects(&mut self) {
        self.aspects.clear();
    }
}
