//! JSON export and import of a whole repository.
//!
//! ```json
//! { "index": { ... } | null, "aspects": [ { ... }, ... ] }
//! ```
//!
//! Documents use the same keys as the YAML files. Import validates every
//! document against its schema before touching the repository.

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use serde_yaml::Value;

use crate::diagnostics::DiagnosticSink;
use crate::error::{ErrorKind, ParseError, RulebookError};
use crate::models::{Aspect, Index};
use crate::repository::{Artifact, Repository};
use crate::schema::{Schema, Strictness, validate};

/// Borrowed view of a repository in envelope shape.
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub index: Option<&'a Index>,
    pub aspects: Vec<&'a Aspect>,
}

/// The repository as an envelope, aspects in insertion order.
pub fn export(repo: &Repository) -> Envelope<'_> {
    Envelope {
        index: repo.index().map(|index| &index.value),
        aspects: repo.aspects().iter().map(|aspect| &aspect.value).collect(),
    }
}

pub fn export_json(repo: &Repository) -> Result<String, RulebookError> {
    Ok(serde_json::to_string_pretty(&export(repo))?)
}

/// Replace the index and all aspects of `repo` with the envelope in `json`.
///
/// Nothing changes unless the whole envelope is valid. Imported artifacts
/// have no origin.
pub fn import(repo: &mut Repository, json: &str, sink: &dyn DiagnosticSink) -> Result<(), RulebookError> {
    let envelope: JsonValue = serde_json::from_str(json)?;
    let JsonValue::Object(envelope) = envelope else {
        return Err(envelope_error("expected a JSON object with `index` and `aspects`").into());
    };

    let index = match field(&envelope, "index")? {
        JsonValue::Null => None,
        value if value.is_object() => Some(document::<Index>(value, "index", sink)?),
        _ => return Err(envelope_error("`index` must be an object or null").into()),
    };
    let JsonValue::Array(aspects) = field(&envelope, "aspects")? else {
        return Err(envelope_error("`aspects` must be an array").into());
    };

    let mut staged = Repository::new();
    if let Some(index) = index {
        staged.set_index(Artifact::new(index, None));
    }
    for (i, value) in aspects.iter().enumerate() {
        let aspect = document::<Aspect>(value, &format!("aspects[{i}]"), sink)?;
        staged.add_unique_aspect(Artifact::new(aspect, None))?;
    }

    match staged.index() {
        Some(index) => repo.set_index(index.clone()),
        None => repo.clear_index(),
    }
    repo.clear_aspects();
    for aspect in staged.aspects() {
        repo.add_aspect(aspect.clone());
    }
    sink.progress(&format!("imported {} aspects", repo.aspects().len()));
    Ok(())
}

fn field<'v>(envelope: &'v Map<String, JsonValue>, key: &str) -> Result<&'v JsonValue, ParseError> {
    envelope
        .get(key)
        .ok_or_else(|| envelope_error(&format!("missing `{key}`")))
}

fn envelope_error(message: &str) -> ParseError {
    ParseError::new(ErrorKind::Schema, format!("invalid export: {message}"))
}

/// Validate one JSON document, reporting every schema error at once.
fn document<T: Schema>(value: &JsonValue, at: &str, sink: &dyn DiagnosticSink) -> Result<T, ParseError> {
    let value: Value = serde_yaml::to_value(value).map_err(|error| {
        ParseError::new(ErrorKind::Schema, format!("invalid {} at `{at}`: {error}", T::KIND))
    })?;
    validate::<T>(&value, Strictness::Exhaustive, sink).map_err(|errors| {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        ParseError::new(
            ErrorKind::Schema,
            format!("invalid {} at `{at}`: {}", T::KIND, details.join("; ")),
        )
    })
}
