//! Walking the CST by data path.
//!
//! The tree knows nothing about what a document means, but it can answer
//! "where does `Assessment.Level-5.Assess[0]` live?". A path is a list of
//! [`Step`]s; each key step picks a mapping entry by its unquoted key text,
//! each index step picks the n-th item of a sequence.

use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// One step of a data path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    Key(&'a str),
    Index(usize),
}

/// The top-level value of a document, if it has one.
pub fn document_value(root: &SyntaxNode) -> Option<SyntaxNode> {
    root.children().find(|n| n.kind().is_value())
}

/// The entries of a block or flow mapping.
pub fn entries(node: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    let is_mapping = matches!(node.kind(), SyntaxKind::MAPPING | SyntaxKind::FLOW_MAPPING);
    node.children()
        .filter(move |n| is_mapping && n.kind() == SyntaxKind::ENTRY)
}

/// Unquoted text of an entry's key.
pub fn entry_key(entry: &SyntaxNode) -> Option<String> {
    entry
        .children()
        .find(|n| n.kind() == SyntaxKind::KEY)
        .map(|key| unquote(&key.text().to_string()))
}

/// The value node of an entry or item; `None` for `key:` with nothing after.
pub fn entry_value(entry: &SyntaxNode) -> Option<SyntaxNode> {
    entry.children().find(|n| n.kind().is_value())
}

/// First entry of `node` whose key reads `key`.
pub fn mapping_entry(node: &SyntaxNode, key: &str) -> Option<SyntaxNode> {
    entries(node).find(|entry| entry_key(entry).as_deref() == Some(key))
}

/// The `index`-th element of a sequence: an `ITEM` node for block
/// sequences, the value node itself for flow sequences.
pub fn sequence_item(node: &SyntaxNode, index: usize) -> Option<SyntaxNode> {
    match node.kind() {
        SyntaxKind::SEQUENCE => node
            .children()
            .filter(|n| n.kind() == SyntaxKind::ITEM)
            .nth(index),
        SyntaxKind::FLOW_SEQUENCE => node.children().filter(|n| n.kind().is_value()).nth(index),
        _ => None,
    }
}

/// Follow `path` from the document value.
///
/// Key and index steps land on the value they name. When that value is
/// empty (`key:` alone, a bare `-`) the entry or item itself is returned,
/// so there is always something with a position to point at.
pub fn lookup(root: &SyntaxNode, path: &[Step<'_>]) -> Option<SyntaxNode> {
    let mut node = document_value(root)?;
    for step in path {
        let holder = match step {
            Step::Key(key) => mapping_entry(&node, key)?,
            Step::Index(index) => sequence_item(&node, *index)?,
        };
        node = if holder.kind().is_value() {
            holder
        } else {
            entry_value(&holder).unwrap_or(holder)
        };
    }
    Some(node)
}

/// The mapping entry `path` ends on, so a position can point at its key.
///
/// `None` unless the last step is a key that exists.
pub fn lookup_entry(root: &SyntaxNode, path: &[Step<'_>]) -> Option<SyntaxNode> {
    let (Step::Key(key), parent) = path.split_last()? else {
        return None;
    };
    mapping_entry(&lookup(root, parent)?, key)
}

/// Strip YAML quotes from a key or scalar. Only the escapes that matter for
/// key matching are undone.
pub fn unquote(text: &str) -> String {
    let text = text.trim();
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        text[1..text.len() - 1]
            .replace("\\\"", "\"")
            .replace("\\\\", "\\")
    } else if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        text[1..text.len() - 1].replace("''", "'")
    } else {
        text.to_string()
    }
}
