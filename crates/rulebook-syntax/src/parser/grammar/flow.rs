//! Flow collections: `[a, b]` and `{key: value}`.
//!
//! Flow content may span lines; line breaks and comments inside the
//! brackets are trivia. An unclosed bracket simply runs to the end of input.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

pub(super) fn flow_sequence(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump(); // `[`

    loop {
        skip_trivia(p);
        match p.current() {
            SyntaxKind::EOF => break,
            SyntaxKind::RBRACKET => {
                p.bump();
                break;
            }
            SyntaxKind::COMMA => p.bump(),
            _ => flow_value(p),
        }
    }

    m.complete(p, SyntaxKind::FLOW_SEQUENCE);
}

pub(super) fn flow_mapping(p: &mut Parser<'_, '_>) {
    let m = p.start();
    p.bump(); // `{`

    loop {
        skip_trivia(p);
        match p.current() {
            SyntaxKind::EOF => break,
            SyntaxKind::RBRACE => {
                p.bump();
                break;
            }
            SyntaxKind::COMMA => p.bump(),
            _ => flow_entry(p),
        }
    }

    m.complete(p, SyntaxKind::FLOW_MAPPING);
}

fn flow_entry(p: &mut Parser<'_, '_>) {
    let key = p.start();
    // Always take one token so a stray closer cannot stall the loop
    p.bump();
    while !at_flow_end(p) && !at_flow_colon(p) {
        p.bump();
    }
    let entry = key.complete(p, SyntaxKind::KEY).precede(p);

    p.eat(SyntaxKind::WHITESPACE);
    if p.eat(SyntaxKind::COLON) {
        skip_trivia(p);
        if !matches!(
            p.current(),
            SyntaxKind::COMMA | SyntaxKind::RBRACE | SyntaxKind::EOF
        ) {
            flow_value(p);
        }
    }

    entry.complete(p, SyntaxKind::ENTRY);
}

fn flow_value(p: &mut Parser<'_, '_>) {
    match p.current() {
        SyntaxKind::LBRACKET => flow_sequence(p),
        SyntaxKind::LBRACE => flow_mapping(p),
        _ => {
            let m = p.start();
            p.bump();
            while !at_flow_end(p) {
                p.bump();
            }
            m.complete(p, SyntaxKind::SCALAR);
        }
    }
}

fn skip_trivia(p: &mut Parser<'_, '_>) {
    while p.current().is_trivia() {
        p.bump();
    }
}

/// End of a flow scalar: a separator, a closer, a line break, or whitespace
/// leading up to one of those.
fn at_flow_end(p: &Parser<'_, '_>) -> bool {
    let n = usize::from(p.at(SyntaxKind::WHITESPACE));
    matches!(
        p.nth(n),
        SyntaxKind::COMMA
            | SyntaxKind::RBRACKET
            | SyntaxKind::RBRACE
            | SyntaxKind::NEWLINE
            | SyntaxKind::EOF
    ) || (n == 1 && p.nth(1) == SyntaxKind::COMMENT)
}

fn at_flow_colon(p: &Parser<'_, '_>) -> bool {
    let n = usize::from(p.at(SyntaxKind::WHITESPACE));
    p.nth(n) == SyntaxKind::COLON
        && matches!(
            p.nth(n + 1),
            SyntaxKind::WHITESPACE
                | SyntaxKind::NEWLINE
                | SyntaxKind::COMMA
                | SyntaxKind::RBRACE
                | SyntaxKind::EOF
        )
}
