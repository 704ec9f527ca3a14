//! Map a [`FieldPath`] back to a line and column in the source text.
//!
//! Schema errors can name paths the concrete tree does not have, such as a
//! required field that is missing. Resolution therefore tries the full path
//! first and then ever shorter prefixes; pointing at the closest ancestor
//! that exists beats pointing nowhere.

use rulebook_syntax::{Step, YamlTree};

use crate::error::Position;
use crate::schema::{FieldPath, PathSegment};

/// A concrete syntax tree that can place data paths in the source.
pub trait SourceTree {
    /// Byte offset where the node for `path` starts, if there is one.
    fn locate(&self, path: &[PathSegment]) -> Option<usize>;

    /// Byte offset of the key that `path` ends on.
    fn locate_key(&self, _path: &[PathSegment]) -> Option<usize> {
        None
    }
}

fn steps(path: &[PathSegment]) -> Vec<Step<'_>> {
    path.iter()
        .map(|segment| match segment {
            PathSegment::Key(key) => Step::Key(key.as_str()),
            PathSegment::Index(index) => Step::Index(*index),
        })
        .collect()
}

impl SourceTree for YamlTree {
    fn locate(&self, path: &[PathSegment]) -> Option<usize> {
        let node = self.lookup(&steps(path))?;
        Some(usize::from(node.text_range().start()))
    }

    fn locate_key(&self, path: &[PathSegment]) -> Option<usize> {
        let entry = self.lookup_entry(&steps(path))?;
        Some(usize::from(entry.text_range().start()))
    }
}

/// Position of the deepest node along `path` that the tree has.
///
/// `None` when there is no tree or not even the document root is in it.
pub fn resolve(source: &str, tree: Option<&dyn SourceTree>, path: &FieldPath) -> Option<Position> {
    let tree = tree?;
    let segments = path.segments();
    (0..=segments.len())
        .rev()
        .find_map(|depth| tree.locate(&segments[..depth]))
        .map(|offset| Position::from_offset(source, offset))
}

/// Position of the key `path` ends on, or [`resolve`] when there is no
/// such key.
pub fn resolve_key(
    source: &str,
    tree: Option<&dyn SourceTree>,
    path: &FieldPath,
) -> Option<Position> {
    tree.and_then(|tree| tree.locate_key(path.segments()))
        .map(|offset| Position::from_offset(source, offset))
        .or_else(|| resolve(source, tree, path))
}
