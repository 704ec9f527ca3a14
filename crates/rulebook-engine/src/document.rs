//! Turn one YAML file into a validated, position-aware artifact.
//!
//! ```text
//! text ──serde_yaml──▶ Value ──schema──▶ model
//!   └────rulebook-syntax──▶ YamlTree (kept for later diagnostics)
//! ```
//!
//! Every failure comes back as a [`ParseError`] that knows its file, its
//! source text and, where it can be found, the offending line and column.

use std::sync::OnceLock;

use regex::Regex;
use rulebook_syntax::YamlTree;
use serde_yaml::Value;

use crate::diagnostics::DiagnosticSink;
use crate::error::{ErrorKind, ParseError, Position};
use crate::position::{SourceTree, resolve, resolve_key};
use crate::repository::{Artifact, Origin};
use crate::schema::{Anchor, Schema, SchemaError, Strictness, validate};

fn location_suffix_regex() -> &'static Regex {
    static LOCATION_SUFFIX: OnceLock<Regex> = OnceLock::new();
    LOCATION_SUFFIX.get_or_init(|| {
        Regex::new(r" at line \d+ column \d+$").expect("Invalid location suffix regex")
    })
}

/// Parse and validate `source` as a `T` document.
pub fn parse_document<T: Schema>(
    filename: &str,
    source: &str,
    sink: &dyn DiagnosticSink,
) -> Result<Artifact<T>, ParseError> {
    let value: Value = serde_yaml::from_str(source)
        .map_err(|error| syntax_error(&error).with_file(filename).with_source(source))?;

    let origin = Origin {
        filename: filename.to_string(),
        source: source.to_string(),
        tree: YamlTree::parse(source),
    };

    match validate::<T>(&value, Strictness::FirstError, sink) {
        Ok(value) => {
            sink.progress(&format!("parsed {} `{filename}`", T::KIND));
            Ok(Artifact::new(value, Some(origin)))
        }
        Err(errors) => Err(schema_error::<T>(&origin, &errors)),
    }
}

/// The YAML parser's message, cut down to its first line, with the
/// position it reports.
fn syntax_error(error: &serde_yaml::Error) -> ParseError {
    let full = error.to_string();
    let message = full.split(":\n").next().unwrap_or_default();
    let message = location_suffix_regex().replace(message, "");
    let position = error
        .location()
        .map(|location| Position::new(location.line(), location.column()));
    ParseError::new(ErrorKind::Syntax, message).with_position(position)
}

/// Report the first schema error that can be placed in the source. When
/// none can, the first error is reported without a position.
fn schema_error<T: Schema>(origin: &Origin, errors: &[SchemaError]) -> ParseError {
    let placed = errors.iter().find_map(|error| {
        let tree: Option<&dyn SourceTree> = Some(&origin.tree);
        let position = match error.anchor {
            Anchor::Value => resolve(&origin.source, tree, &error.path),
            Anchor::Key => resolve_key(&origin.source, tree, &error.path),
        };
        position.map(|position| (error, position))
    });

    match placed {
        Some((error, position)) => {
            ParseError::new(ErrorKind::Schema, format!("invalid {}: {error}", T::KIND))
                .with_file(&origin.filename)
                .with_source(&origin.source)
                .with_position(Some(position))
        }
        None => {
            let message = match errors.first() {
                Some(error) => format!("invalid {}: {error}", T::KIND),
                None => format!("invalid {}", T::KIND),
            };
            ParseError::new(ErrorKind::Schema, message).with_file(&origin.filename)
        }
    }
}
