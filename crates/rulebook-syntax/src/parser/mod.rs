//! # Parser - Event-Based Tree Construction
//!
//! Turns the token stream into a syntax tree using the event model from
//! rust-analyzer. Grammar rules never touch rowan directly: they emit a flat
//! list of [`Event`]s (`Start`, `Token`, `Finish`) and the [`Sink`] replays
//! them into a `GreenNodeBuilder`.
//!
//! YAML is indentation sensitive, so on top of the usual token inspection
//! the parser can report the column of the current token and the indentation
//! of the line it sits on. Those two numbers drive every block-level
//! decision in [`grammar`].
//!
//! ## Markers
//!
//! `parser.start()` returns a [`Marker`] that must be completed with a kind
//! or abandoned. Dropping it otherwise panics. A [`CompletedMarker`] can be
//! wrapped after the fact with `precede()`, which is how `key: value` is
//! recognised: the key scalar is parsed first and then wrapped into `KEY`
//! once the colon shows up.
//!
//! ```
//! use rulebook_syntax::{parse, SyntaxKind};
//!
//! let tree = parse("Id: SEC-01\n");
//! assert_eq!(tree.kind(), SyntaxKind::ROOT);
//! assert_eq!(tree.text().to_string(), "Id: SEC-01\n");
//! ```

pub mod event;
pub mod sink;

mod grammar;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
        }
    }

    /// Parse the tokens and return a syntax tree.
    pub fn parse(mut self) -> SyntaxNode {
        grammar::root(&mut self);
        Sink::new(self.tokens, self.events).finish()
    }

    /// Parse the tokens and return the green tree, which unlike the
    /// [`SyntaxNode`] view can be stored and sent between threads.
    pub fn parse_green(mut self) -> rowan::GreenNode {
        grammar::root(&mut self);
        Sink::new(self.tokens, self.events).finish_green()
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map_or(SyntaxKind::EOF, |t| t.kind)
    }

    /// Text of the token n positions ahead, empty past the end.
    pub fn nth_text(&self, n: usize) -> &'input str {
        self.tokens.get(self.pos + n).map_or("", |t| t.text)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Column (in chars, 0-based) of the current token.
    pub fn column(&self) -> usize {
        self.tokens[..self.pos.min(self.tokens.len())]
            .iter()
            .rev()
            .take_while(|t| t.kind != SyntaxKind::NEWLINE)
            .map(|t| t.text.chars().count())
            .sum()
    }

    /// Indentation of the line starting at the current token.
    ///
    /// Returns `None` for lines that carry no content (blank or comment
    /// only); callers treat those as trivia wherever they appear.
    pub fn line_indent(&self) -> Option<usize> {
        let mut n = 0;
        let mut indent = 0;
        if self.nth(0) == SyntaxKind::WHITESPACE {
            indent = self.nth_text(0).chars().count();
            n = 1;
        }
        match self.nth(n) {
            SyntaxKind::NEWLINE | SyntaxKind::COMMENT | SyntaxKind::EOF => None,
            _ => Some(indent),
        }
    }

    /// Whether the rest of the line (leading whitespace ignored) is a
    /// `key: ...` line.
    ///
    /// Looks for a colon followed by whitespace, a line break or the end of
    /// input, outside any flow brackets.
    pub fn at_key_line(&self) -> bool {
        let start = usize::from(self.at(SyntaxKind::WHITESPACE));
        let mut depth = 0usize;
        let mut n = start;
        loop {
            match self.nth(n) {
                // A comment runs to the end of the line, so no key follows
                SyntaxKind::NEWLINE | SyntaxKind::EOF | SyntaxKind::COMMENT => return false,
                SyntaxKind::LBRACKET | SyntaxKind::LBRACE => depth += 1,
                SyntaxKind::RBRACKET | SyntaxKind::RBRACE => depth = depth.saturating_sub(1),
                SyntaxKind::COLON if depth == 0 && n > start => {
                    if matches!(
                        self.nth(n + 1),
                        SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
                    ) {
                        return true;
                    }
                }
                _ => {}
            }
            n += 1;
        }
    }

    /// Whether the rest of the line (leading whitespace ignored) opens a
    /// block sequence item: a `-` followed by a space or a line break.
    pub fn at_item_line(&self) -> bool {
        let start = usize::from(self.at(SyntaxKind::WHITESPACE));
        self.nth(start) == SyntaxKind::DASH
            && matches!(
                self.nth(start + 1),
                SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
            )
    }

    /// Consume the rest of the line, including its line break.
    pub fn bump_line(&mut self) {
        while !self.at_end() && !self.at(SyntaxKind::NEWLINE) {
            self.bump();
        }
        self.eat(SyntaxKind::NEWLINE);
    }
}

/// A marker for a node being constructed.
///
/// Must be completed or abandoned; dropping it otherwise panics.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    pos: usize,
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) -> CompletedMarker {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::start(kind);
        p.events.push(Event::Finish);
        CompletedMarker { pos: self.pos }
    }

    /// Abandon this marker without creating a node.
    ///
    /// The placeholder is popped when nothing followed it, otherwise it stays
    /// behind as an inert event the sink skips.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// A marker for a node that has been completed.
#[derive(Debug, Clone, Copy)]
pub struct CompletedMarker {
    pos: usize,
}

impl CompletedMarker {
    /// Open a new node that will become the parent of this one.
    pub fn precede(self, p: &mut Parser<'_, '_>) -> Marker {
        let new_pos = p.events.len();
        p.events.push(Event::Placeholder);

        if let Event::Start { forward_parent, .. } = &mut p.events[self.pos] {
            *forward_parent = Some(new_pos);
        }

        Marker {
            pos: new_pos,
            completed: false,
        }
    }
}

/// Parse YAML source into a syntax tree.
pub fn parse(source: &str) -> SyntaxNode {
    let tokens = lex(source);
    Parser::new(&tokens).parse()
}
