//! # Grammar Rules
//!
//! Each rule takes a `&mut Parser`, inspects tokens, consumes them and
//! builds structure through markers.
//!
//! - [`block`] - mappings, sequences, entries, items and scalars, driven by
//!   indentation
//! - [`flow`] - `[...]` and `{...}` collections
//!
//! ## Indentation
//!
//! Block rules receive the indentation of the collection they belong to and
//! stop as soon as a content line is indented differently. Blank lines and
//! comment-only lines never end a collection; they are swallowed as trivia
//! into whichever node is open when they are met.
//!
//! ## Error Recovery
//!
//! Rules never fail. Content that fits nowhere is wrapped line by line in an
//! `ERROR` node, so the tree always covers every input byte. Validity is the
//! semantic parser's business; this tree only has to place things.

mod block;
mod flow;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse the root document.
pub fn root(p: &mut Parser<'_, '_>) {
    let m = p.start();

    block::trivia(p);
    let mut inline = false;
    if p.at(SyntaxKind::DOC_START)
        && matches!(
            p.nth(1),
            SyntaxKind::WHITESPACE | SyntaxKind::NEWLINE | SyntaxKind::EOF
        )
    {
        p.bump();
        p.eat(SyntaxKind::WHITESPACE);
        if matches!(
            p.current(),
            SyntaxKind::NEWLINE | SyntaxKind::COMMENT | SyntaxKind::EOF
        ) {
            p.bump_line();
            block::trivia(p);
        } else {
            // `--- {Id: A}` puts the document value on the marker line
            block::block_node(p, p.column(), None);
            inline = true;
        }
    }

    if !inline && let Some(indent) = p.line_indent() {
        p.eat(SyntaxKind::WHITESPACE);
        block::block_node(p, indent, None);
    }

    // Anything the top-level value did not claim
    loop {
        block::trivia(p);
        if p.at_end() {
            break;
        }
        let junk = p.start();
        p.bump_line();
        junk.complete(p, SyntaxKind::ERROR);
    }

    m.complete(p, SyntaxKind::ROOT);
}
