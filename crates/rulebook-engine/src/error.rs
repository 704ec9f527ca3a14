//! Error types shared by every stage of the pipeline.
//!
//! [`ParseError`] is the one user-facing diagnostic: syntax, schema,
//! cross-reference and generation failures all carry the same shape so the
//! caller can print them the same way. Caller mistakes such as rendering
//! before an index is loaded are [`RulebookError`] variants with no source
//! position.

use std::fmt;

use crossterm::style::{Color, Stylize};

use crate::io::IoError;

/// Which stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The text is not well-formed YAML (or JSON, for imports).
    Syntax,
    /// Well-formed, but the document does not match its schema.
    Schema,
    /// A reference does not resolve against the repository.
    CrossReference,
    /// The model is inconsistent in a way only rendering discovers.
    Generation,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::Schema => "schema",
            ErrorKind::CrossReference => "reference",
            ErrorKind::Generation => "generation",
        }
    }
}

/// A 1-based line/column pair. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Convert a byte offset into `source` to a position.
    ///
    /// Offsets past the end or inside a multi-byte character are clamped
    /// back to the nearest character boundary.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A diagnostic that can point into the offending source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub file: Option<String>,
    pub source: Option<String>,
    pub position: Option<Position>,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
            source: None,
            position: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_position(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }

    /// Where the error points, 1:1 when nothing better is known.
    pub fn line_column(&self) -> Position {
        self.position.unwrap_or_default()
    }

    /// Render the error for a terminal.
    ///
    /// With a file, its text and a position this shows the offending line
    /// with a caret under the column. Anything less falls back to a bare
    /// `ERROR: message` line.
    pub fn render(&self, color: bool) -> String {
        let (Some(file), Some(source), Some(position)) =
            (&self.file, &self.source, self.position)
        else {
            return format!("{} {}\n", paint("ERROR:", Color::Red, color), self.message);
        };

        let line_text = source
            .lines()
            .nth(position.line.saturating_sub(1))
            .unwrap_or_default();
        let number = position.line.to_string();
        let gutter = " ".repeat(number.len());
        let caret_pad = " ".repeat(position.column.saturating_sub(1));

        let mut out = String::new();
        out.push_str(&format!(
            "{}: {}\n",
            paint(&format!("error[{}]", self.kind.label()), Color::Red, color),
            self.message
        ));
        out.push_str(&format!(
            "{}{} {file}:{position}\n",
            gutter,
            paint("-->", Color::Blue, color)
        ));
        out.push_str(&format!("{gutter} {}\n", paint("|", Color::Blue, color)));
        out.push_str(&format!(
            "{} {line_text}\n",
            paint(&format!("{number} |"), Color::Blue, color)
        ));
        out.push_str(&format!(
            "{gutter} {} {caret_pad}{}\n",
            paint("|", Color::Blue, color),
            paint("^", Color::Red, color)
        ));
        out
    }
}

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.with(color).bold().to_string()
    } else {
        text.to_string()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.position) {
            (Some(file), Some(position)) => write!(f, "{file}:{position}: {}", self.message),
            (Some(file), None) => write!(f, "{file}: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Everything the engine can fail with.
#[derive(Debug, thiserror::Error)]
pub enum RulebookError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("index still not loaded")]
    IndexNotLoaded,
    #[error("unknown format `{0}`, expected `card` or `prose`")]
    UnknownFormat(String),
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
