//! Block-level grammar rules.

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

use super::flow;

/// Swallow blank and comment-only lines. Expects to sit at a line start.
pub(super) fn trivia(p: &mut Parser<'_, '_>) {
    while !p.at_end() && p.line_indent().is_none() {
        p.bump_line();
    }
}

/// `indent` is strictly deeper than the owning collection's indentation.
/// `None` stands for "above the document", deeper than nothing.
fn deeper(indent: usize, parent: Option<usize>) -> bool {
    parent.is_none_or(|parent| indent > parent)
}

/// Parse the block node starting at the current token, which sits at
/// column `column` and belongs to a collection indented by `parent`.
pub(super) fn block_node(p: &mut Parser<'_, '_>, column: usize, parent: Option<usize>) {
    if p.at_item_line() {
        sequence(p, column);
    } else if p.at_key_line() {
        mapping(p, column);
    } else {
        inline_value(p, parent);
    }
}

/// A block mapping whose keys all sit at column `indent`.
fn mapping(p: &mut Parser<'_, '_>, indent: usize) {
    let m = p.start();

    loop {
        entry(p, indent);
        trivia(p);
        if p.line_indent() != Some(indent) || p.at_item_line() || !p.at_key_line() {
            break;
        }
        p.eat(SyntaxKind::WHITESPACE);
    }

    m.complete(p, SyntaxKind::MAPPING);
}

/// `key: value`, with the value on the same line or indented below.
fn entry(p: &mut Parser<'_, '_>, indent: usize) {
    let key = p.start();
    while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !at_value_indicator(p) {
        p.bump();
    }
    let entry = key.complete(p, SyntaxKind::KEY).precede(p);

    if p.eat(SyntaxKind::COLON) {
        p.eat(SyntaxKind::WHITESPACE);
        nested_value(p, indent);
    } else {
        p.eat(SyntaxKind::NEWLINE);
    }

    entry.complete(p, SyntaxKind::ENTRY);
}

/// A `- value` item of a block sequence.
fn sequence(p: &mut Parser<'_, '_>, indent: usize) {
    let m = p.start();

    loop {
        item(p, indent);
        trivia(p);
        if p.line_indent() != Some(indent) || !p.at_item_line() {
            break;
        }
        p.eat(SyntaxKind::WHITESPACE);
    }

    m.complete(p, SyntaxKind::SEQUENCE);
}

fn item(p: &mut Parser<'_, '_>, indent: usize) {
    let m = p.start();
    p.bump(); // `-`

    if p.at(SyntaxKind::WHITESPACE)
        && !matches!(
            p.nth(1),
            SyntaxKind::NEWLINE | SyntaxKind::EOF | SyntaxKind::COMMENT
        )
    {
        p.bump();
        // Compact forms: `- key: value` and `- - value`
        let column = p.column();
        if p.at_item_line() {
            sequence(p, column);
        } else if p.at_key_line() {
            mapping(p, column);
        } else {
            inline_value(p, Some(indent));
        }
    } else {
        nested_value(p, indent);
    }

    m.complete(p, SyntaxKind::ITEM);
}

/// The value after `key:` or `-`: either on the same line, or a block
/// indented below it, or nothing at all.
fn nested_value(p: &mut Parser<'_, '_>, indent: usize) {
    p.eat(SyntaxKind::WHITESPACE);
    if !matches!(
        p.current(),
        SyntaxKind::NEWLINE | SyntaxKind::EOF | SyntaxKind::COMMENT
    ) {
        inline_value(p, Some(indent));
        return;
    }

    p.eat(SyntaxKind::COMMENT);
    p.eat(SyntaxKind::NEWLINE);
    trivia(p);

    match p.line_indent() {
        Some(column) if column > indent => {
            p.eat(SyntaxKind::WHITESPACE);
            block_node(p, column, Some(indent));
        }
        // A sequence may sit at the same indentation as its key
        Some(column) if column == indent && p.at_item_line() => {
            p.eat(SyntaxKind::WHITESPACE);
            sequence(p, column);
        }
        _ => {}
    }
}

/// A value that starts on the current line.
fn inline_value(p: &mut Parser<'_, '_>, parent: Option<usize>) {
    match p.current() {
        SyntaxKind::PIPE | SyntaxKind::GT => {
            block_scalar(p, parent);
            return;
        }
        SyntaxKind::LBRACKET => flow::flow_sequence(p),
        SyntaxKind::LBRACE => flow::flow_mapping(p),
        _ => scalar(p, parent),
    }
    finish_line(p);
}

/// A plain or quoted scalar, continued on following lines that are
/// indented deeper than `parent`.
fn scalar(p: &mut Parser<'_, '_>, parent: Option<usize>) {
    let m = p.start();

    loop {
        while !p.at_end() && !p.at(SyntaxKind::NEWLINE) && !at_trailing_space(p) {
            p.bump();
        }
        if !p.at(SyntaxKind::NEWLINE) || !continues(p, parent) {
            break;
        }
        // Line break, blank lines and indentation of the continuation
        p.bump();
        while p.line_indent().is_none() && !p.at_end() {
            p.bump_line();
        }
        p.eat(SyntaxKind::WHITESPACE);
    }

    m.complete(p, SyntaxKind::SCALAR);
}

/// At a line break: is the next content line a continuation of a plain
/// scalar owned by `parent`?
fn continues(p: &Parser<'_, '_>, parent: Option<usize>) -> bool {
    let mut n = 1;
    loop {
        let mut indent = 0;
        if p.nth(n) == SyntaxKind::WHITESPACE {
            indent = p.nth_text(n).chars().count();
            n += 1;
        }
        match p.nth(n) {
            SyntaxKind::NEWLINE => n += 1,
            SyntaxKind::EOF | SyntaxKind::COMMENT => return false,
            _ => return deeper(indent, parent),
        }
    }
}

/// `|` or `>` with its header, followed by every line indented deeper than
/// `parent` (blank lines included).
fn block_scalar(p: &mut Parser<'_, '_>, parent: Option<usize>) {
    let m = p.start();
    p.bump_line();

    while !p.at_end() {
        let blank = matches!(
            (p.current(), p.nth(1)),
            (SyntaxKind::NEWLINE, _)
                | (SyntaxKind::WHITESPACE, SyntaxKind::NEWLINE | SyntaxKind::EOF)
        );
        let indent = if p.at(SyntaxKind::WHITESPACE) {
            p.nth_text(0).chars().count()
        } else {
            0
        };
        if !blank && !deeper(indent, parent) {
            break;
        }
        p.bump_line();
    }

    m.complete(p, SyntaxKind::BLOCK_SCALAR);
}

/// Trailing whitespace and comment, then the line break. Anything else left
/// on the line is junk.
fn finish_line(p: &mut Parser<'_, '_>) {
    p.eat(SyntaxKind::WHITESPACE);
    p.eat(SyntaxKind::COMMENT);
    if !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
        let junk = p.start();
        while !p.at_end() && !p.at(SyntaxKind::NEWLINE) {
            p.bump();
        }
        junk.complete(p, SyntaxKind::ERROR);
    }
    p.eat(SyntaxKind::NEWLINE);
}

/// `:` followed by whitespace, a line break or the end of input.
fn at_value_indicator(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::COLON)
        && matches!(
            p.nth(1),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
}

/// Whitespace that ends the content of a line: before a comment, a line
/// break or the end of input.
fn at_trailing_space(p: &Parser<'_, '_>) -> bool {
    p.at(SyntaxKind::WHITESPACE)
        && matches!(
            p.nth(1),
            SyntaxKind::NEWLINE | SyntaxKind::EOF | SyntaxKind::COMMENT
        )
}
