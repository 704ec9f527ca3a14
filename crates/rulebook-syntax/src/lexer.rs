//! # Lexer - Tokenizing YAML Source
//!
//! First stage of parsing: break source text into tokens with [Logos].
//!
//! [Logos]: https://docs.rs/logos
//!
//! Every byte of the input lands in exactly one token, so concatenating the
//! token texts reproduces the source:
//!
//! ```
//! use rulebook_syntax::lexer::lex;
//!
//! let input = "Id: SEC-01\nName: Secrets\n";
//! let tokens = lex(input);
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! Tokens are context-free. The lexer does not know whether `:` separates a
//! key from its value or is part of `ctx:Foo.Bar`, nor whether `-` opens a
//! sequence item or sits inside `msg-CTO`. The grammar decides that from the
//! surrounding tokens.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// Kept apart from [`SyntaxKind`] because Logos derives on it.
///
/// [`SyntaxKind`]: crate::syntax_kind::SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"\r?\n")]
    Newline,

    #[regex(r"#[^\r\n]*")]
    Comment,

    #[token(":")]
    Colon,

    #[token("-")]
    Dash,

    #[token("---")]
    DocStart,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token("|")]
    Pipe,

    #[token(">")]
    Gt,

    /// Quoted scalars never span lines here; an unterminated quote falls
    /// back to a one-character TEXT token.
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*""#)]
    #[regex(r"'([^'\r\n]|'')*'")]
    Quoted,

    #[regex(r#"[^\s:#\[\]{},|>"'-]+"#)]
    Text,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::DocStart => SyntaxKind::DOC_START,
            TokenKind::LBracket => SyntaxKind::LBRACKET,
            TokenKind::RBracket => SyntaxKind::RBRACKET,
            TokenKind::LBrace => SyntaxKind::LBRACE,
            TokenKind::RBrace => SyntaxKind::RBRACE,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Quoted => SyntaxKind::QUOTED,
            TokenKind::Text => SyntaxKind::TEXT,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        // Unrecognised input (a stray quote) is kept as plain text
        let kind = result.map_or(SyntaxKind::TEXT, TokenKind::to_syntax_kind);
        tokens.push(Token { kind, text });
    }

    tokens
}
