//! Closed-schema validation of parsed YAML values.
//!
//! `serde_yaml` turns the text into a [`Value`]; the [`Schema`] impls here
//! walk that value by hand and either build the typed model or report what
//! is wrong, each problem tagged with the [`FieldPath`] it was found at.
//! Unknown keys are always errors.
//!
//! Two modes exist. The document parser only ever reports one problem, so it
//! validates with [`Strictness::FirstError`] and stops at the first; imports
//! collect everything with [`Strictness::Exhaustive`].

mod aspect;
mod index;

use std::fmt;

use chrono::NaiveDate;
use serde_yaml::{Mapping, Value};

use crate::diagnostics::DiagnosticSink;
use crate::models::{DATE_FORMAT, OPEN_ENDED, Until};

/// The two document kinds a rulebook is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Index,
    Aspect,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Index => f.write_str("index"),
            DocumentKind::Aspect => f.write_str("aspect"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a document, e.g. `Assessment.Level-5.Assess[0]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(PathSegment::Key(key.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.0.push(PathSegment::Index(index));
        self
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Which part of the node at a path an error is about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Anchor {
    #[default]
    Value,
    /// The key itself, for fields that should not be there at all.
    Key,
}

/// One validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    pub path: FieldPath,
    pub message: String,
    pub anchor: Anchor,
}

impl SchemaError {
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            anchor: Anchor::Value,
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "`{}`: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Stop at the first error.
    FirstError,
    /// Report every error in the document.
    Exhaustive,
}

/// A document kind with a closed schema.
pub trait Schema: Sized {
    const KIND: DocumentKind;

    /// Check `value` and build the model. Returns `None` once any error has
    /// been reported to `checker`.
    fn check(value: &Value, checker: &mut Checker<'_>) -> Option<Self>;
}

/// Validate `value` as a `T`.
pub fn validate<T: Schema>(
    value: &Value,
    strictness: Strictness,
    sink: &dyn DiagnosticSink,
) -> Result<T, Vec<SchemaError>> {
    let mut checker = Checker::new(strictness, sink);
    let checked = T::check(value, &mut checker);
    match checked {
        Some(model) if checker.errors.is_empty() => Ok(model),
        _ if checker.errors.is_empty() => Err(vec![SchemaError::new(
            FieldPath::root(),
            format!("invalid {}", T::KIND),
        )]),
        _ => Err(checker.errors),
    }
}

/// Validation state: the path being checked and the errors so far.
pub struct Checker<'s> {
    strictness: Strictness,
    path: FieldPath,
    errors: Vec<SchemaError>,
    sink: &'s dyn DiagnosticSink,
}

/// The keys of a mapping that passed the closed-schema check.
pub struct Fields<'v> {
    map: &'v Mapping,
}

impl<'v> Fields<'v> {
    fn get(&self, key: &str) -> Option<&'v Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    /// Whether the key is there at all, even with a null value.
    fn present(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }
}

impl<'s> Checker<'s> {
    fn new(strictness: Strictness, sink: &'s dyn DiagnosticSink) -> Self {
        Self {
            strictness,
            path: FieldPath::root(),
            errors: Vec::new(),
            sink,
        }
    }

    /// Whether checking should stop.
    fn stopped(&self) -> bool {
        self.strictness == Strictness::FirstError && !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Record an error at the current path.
    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message.into(), Anchor::Value);
    }

    /// Record an error about the key of the current path.
    fn key_error(&mut self, message: impl Into<String>) {
        self.push(message.into(), Anchor::Key);
    }

    fn push(&mut self, message: String, anchor: Anchor) {
        if self.stopped() {
            return;
        }
        self.errors.push(SchemaError {
            path: self.path.clone(),
            message,
            anchor,
        });
    }

    /// Report a non-fatal problem at the current path.
    pub fn warning(&mut self, message: impl fmt::Display) {
        if self.path.is_root() {
            self.sink.warning(&message.to_string());
        } else {
            self.sink.warning(&format!("`{}`: {message}", self.path));
        }
    }

    pub fn at_key<R>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(PathSegment::Key(key.to_string()));
        let result = f(self);
        self.path.pop();
        result
    }

    pub fn at_index<R>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(PathSegment::Index(index));
        let result = f(self);
        self.path.pop();
        result
    }

    /// Check that `value` is a mapping whose keys are all in `allowed`.
    fn object<'v>(&mut self, value: &'v Value, allowed: &[&str]) -> Option<Fields<'v>> {
        let map = self.mapping(value)?;
        for key in map.keys() {
            match key.as_str() {
                Some(name) if allowed.contains(&name) => {}
                Some(name) => self.at_key(name, |c| {
                    c.key_error(format!(
                        "unknown field, expected one of: {}",
                        allowed.join(", ")
                    ))
                }),
                None => self.error("keys must be strings"),
            }
            if self.stopped() {
                return None;
            }
        }
        // Known fields are still checked after an unknown one so that
        // exhaustive validation reports them too
        Some(Fields { map })
    }

    fn mapping<'v>(&mut self, value: &'v Value) -> Option<&'v Mapping> {
        match value {
            Value::Mapping(map) => Some(map),
            other => {
                self.error(format!("expected a mapping, found {}", describe(other)));
                None
            }
        }
    }

    fn sequence<'v>(&mut self, value: &'v Value) -> Option<&'v [Value]> {
        match value {
            Value::Sequence(items) => Some(items),
            other => {
                self.error(format!("expected a list, found {}", describe(other)));
                None
            }
        }
    }

    /// A field that must be present (and not null).
    fn required<T>(
        &mut self,
        fields: &Fields<'_>,
        key: &str,
        check: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<T> {
        if self.stopped() {
            return None;
        }
        match fields.get(key) {
            Some(value) => self.at_key(key, |c| check(c, value)),
            None => {
                self.at_key(key, |c| c.error("missing required field"));
                None
            }
        }
    }

    /// A field that may be absent. The outer `None` means it was present but
    /// invalid.
    fn optional<T>(
        &mut self,
        fields: &Fields<'_>,
        key: &str,
        check: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<Option<T>> {
        if self.stopped() {
            return None;
        }
        match fields.get(key) {
            Some(value) => self.at_key(key, |c| check(c, value)).map(Some),
            None => Some(None),
        }
    }

    /// Check every item of a list, keeping going past bad items unless
    /// stopping at the first error.
    fn list<T>(
        &mut self,
        value: &Value,
        mut check: impl FnMut(&mut Self, &Value) -> Option<T>,
    ) -> Option<Vec<T>> {
        let items = self.sequence(value)?;
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match self.at_index(i, |c| check(c, item)) {
                Some(checked) => out.push(checked),
                None => ok = false,
            }
            if self.stopped() {
                return None;
            }
        }
        ok.then_some(out)
    }

    fn string(&mut self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.error(format!("expected a string, found {}", describe(other)));
                None
            }
        }
    }

    /// A string, number or boolean, kept as text.
    fn text(&mut self, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                self.error(format!("expected a string, found {}", describe(other)));
                None
            }
        }
    }

    fn string_list(&mut self, value: &Value) -> Option<Vec<String>> {
        self.list(value, Self::string)
    }

    fn date(&mut self, value: &Value) -> Option<NaiveDate> {
        let parsed = match value {
            Value::String(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.error("expected a date (YYYY-MM-DD)");
        }
        parsed
    }

    fn until(&mut self, value: &Value) -> Option<Until> {
        if value.as_str() == Some(OPEN_ENDED) {
            return Some(Until::Open);
        }
        let parsed = match value {
            Value::String(s) => NaiveDate::parse_from_str(s, DATE_FORMAT).ok().map(Until::Date),
            _ => None,
        };
        if parsed.is_none() {
            self.error(format!("expected a date (YYYY-MM-DD) or `{OPEN_ENDED}`"));
        }
        parsed
    }

    /// A string that must match one of the reference forms.
    fn reference(
        &mut self,
        value: &Value,
        matches: fn(&str) -> bool,
        expected: &str,
    ) -> Option<String> {
        let text = self.string(value)?;
        if matches(&text) {
            Some(text)
        } else {
            self.error(format!("expected {expected}, found `{text}`"));
            None
        }
    }
}

/// Short description of a value's type for error messages.
fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use pretty_assertions::assert_eq;

    #[test]
    fn field_path_display() {
        let path = FieldPath::root()
            .key("Assessment")
            .key("Level-5")
            .key("Assess")
            .index(0)
            .key("MUST");
        assert_eq!(path.to_string(), "Assessment.Level-5.Assess[0].MUST");
        assert_eq!(FieldPath::root().to_string(), "");
    }

    #[test]
    fn schema_error_display() {
        let error = SchemaError::new(FieldPath::root().key("Name"), "missing required field");
        assert_eq!(error.to_string(), "`Name`: missing required field");
    }

    struct Pair {
        left: String,
        right: String,
    }

    impl Schema for Pair {
        const KIND: DocumentKind = DocumentKind::Index;

        fn check(value: &Value, c: &mut Checker<'_>) -> Option<Self> {
            let fields = c.object(value, &["Left", "Right"])?;
            let left = c.required(&fields, "Left", Checker::string);
            let right = c.required(&fields, "Right", Checker::string);
            Some(Pair {
                left: left?,
                right: right?,
            })
        }
    }

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn first_error_mode_reports_one_error() {
        let value = yaml("Left: 1\nRight: 2\n");
        let errors = validate::<Pair>(&value, Strictness::FirstError, &NullSink)
            .err()
            .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, FieldPath::root().key("Left"));
    }

    #[test]
    fn exhaustive_mode_reports_every_error() {
        let value = yaml("Left: 1\nRight: 2\nExtra: 3\n");
        let errors = validate::<Pair>(&value, Strictness::Exhaustive, &NullSink)
            .err()
            .unwrap();
        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["Extra", "Left", "Right"]);

        let value = yaml("Left: 1\nRight: 2\n");
        let errors = validate::<Pair>(&value, Strictness::Exhaustive, &NullSink)
            .err()
            .unwrap();
        let paths: Vec<String> = errors.iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["Left", "Right"]);
    }

    #[test]
    fn valid_value_builds_model() {
        let pair = validate::<Pair>(&yaml("Left: a\nRight: b\n"), Strictness::FirstError, &NullSink)
            .ok()
            .unwrap();
        assert_eq!((pair.left.as_str(), pair.right.as_str()), ("a", "b"));
    }

    #[test]
    fn null_counts_as_missing() {
        let errors = validate::<Pair>(&yaml("Left: a\nRight:\n"), Strictness::FirstError, &NullSink)
            .err()
            .unwrap();
        assert_eq!(errors[0].to_string(), "`Right`: missing required field");
    }
}
