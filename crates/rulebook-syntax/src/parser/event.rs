//! Events emitted by the grammar, replayed by the sink.
//!
//! ```text
//! Start(ENTRY)
//!   Start(KEY) Token(TEXT) Finish
//!   Token(COLON) Token(WHITESPACE)
//!   Start(SCALAR) Token(TEXT) Finish
//!   Token(NEWLINE)
//! Finish
//! ```
//!
//! A `Start` may carry a `forward_parent`: the index of another `Start` that
//! must be opened around it. `CompletedMarker::precede` sets these links.

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Open a composite node.
    Start {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },

    /// Attach the next raw token to the open node, under `kind`.
    Token { kind: SyntaxKind },

    /// Close the most recently opened node.
    Finish,

    /// Reserved slot of a marker that has not been completed (or was
    /// abandoned); the sink skips it.
    Placeholder,
}

impl Event {
    /// Create a start event with no forward parent.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start {
            kind,
            forward_parent: None,
        }
    }

    /// Create a token event.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
