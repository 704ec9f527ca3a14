//! Sink for converting parser events into a Rowan green tree.

use rowan::{GreenNode, GreenNodeBuilder};

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// Replays events against the token stream.
pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    cursor: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Sink<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>], events: Vec<Event>) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            cursor: 0,
            events,
        }
    }

    /// Build the tree and hand back its root node.
    pub fn finish(self) -> SyntaxNode {
        SyntaxNode::new_root(self.finish_green())
    }

    /// Build the tree and return the (thread-safe) green root.
    pub fn finish_green(mut self) -> GreenNode {
        let mut chain = Vec::new();

        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Placeholder) {
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    // Follow forward_parent links, then open outermost first
                    chain.push(kind);
                    let mut next = forward_parent;
                    while let Some(idx) = next {
                        match std::mem::replace(&mut self.events[idx], Event::Placeholder) {
                            Event::Start {
                                kind,
                                forward_parent,
                            } => {
                                chain.push(kind);
                                next = forward_parent;
                            }
                            _ => unreachable!(),
                        }
                    }
                    for kind in chain.drain(..).rev() {
                        self.builder.start_node(kind.into());
                    }
                }
                Event::Token { kind } => self.token(kind),
                Event::Finish => self.builder.finish_node(),
                Event::Placeholder => {}
            }
        }

        self.builder.finish()
    }

    fn token(&mut self, kind: SyntaxKind) {
        let text = self.tokens[self.cursor].text;
        self.cursor += 1;
        self.builder.token(kind.into(), text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    #[test]
    fn sink_builds_nested_nodes() {
        let tokens = lex("a");
        let events = vec![
            Event::start(SyntaxKind::ROOT),
            Event::start(SyntaxKind::SCALAR),
            Event::token(SyntaxKind::TEXT),
            Event::Finish,
            Event::Finish,
        ];

        let tree = Sink::new(&tokens, events).finish();

        assert_eq!(tree.kind(), SyntaxKind::ROOT);
        let scalar = tree.first_child().unwrap();
        assert_eq!(scalar.kind(), SyntaxKind::SCALAR);
        assert_eq!(scalar.text().to_string(), "a");
    }

    #[test]
    fn forward_parent_wraps_earlier_node() {
        // KEY is completed first, ENTRY is opened around it afterwards
        let tokens = lex("k:");
        let events = vec![
            Event::start(SyntaxKind::ROOT),
            Event::Start {
                kind: SyntaxKind::KEY,
                forward_parent: Some(4),
            },
            Event::token(SyntaxKind::TEXT),
            Event::Finish,
            Event::start(SyntaxKind::ENTRY),
            Event::token(SyntaxKind::COLON),
            Event::Finish,
            Event::Finish,
        ];

        let tree = Sink::new(&tokens, events).finish();
        let entry = tree.first_child().unwrap();
        assert_eq!(entry.kind(), SyntaxKind::ENTRY);
        assert_eq!(entry.first_child().unwrap().kind(), SyntaxKind::KEY);
        assert_eq!(entry.text().to_string(), "k:");
    }
}
