//! # rulebook-syntax
//!
//! A lossless YAML syntax tree using [Rowan] + [Logos], following the
//! [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! This crate does not decide what a YAML document *means*; `serde_yaml`
//! does that in the engine. It answers a narrower question: where in the
//! source text does a given piece of data live? Schema and cross-reference
//! diagnostics use it to point at the offending line and column.
//!
//! ## Pipeline
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!               (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! The tree keeps every byte of the input, comments and indentation
//! included, and never fails to build: malformed regions end up in `ERROR`
//! nodes.
//!
//! ## Module Structure
//!
//! ```text
//! rulebook-syntax/
//! ├── lib.rs           # Public API, YamlTree
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer
//! ├── navigate.rs      # Path lookup over the tree
//! └── parser/
//!     ├── mod.rs       # Parser struct, Marker system, public parse() function
//!     ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs      # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs   # Root document parsing
//!         ├── block.rs # Indentation-driven mappings, sequences and scalars
//!         └── flow.rs  # [..] and {..} collections
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use rulebook_syntax::{Step, YamlTree};
//!
//! let source = "Id: SEC-01\nAssessment:\n  Level-5:\n    What: Rotate keys\n";
//! let tree = YamlTree::parse(source);
//!
//! let what = tree
//!     .lookup(&[Step::Key("Assessment"), Step::Key("Level-5"), Step::Key("What")])
//!     .unwrap();
//! assert_eq!(what.text().to_string(), "Rotate keys");
//! assert_eq!(u32::from(what.text_range().start()), 42);
//! ```

pub mod lexer;
pub mod navigate;
pub mod parser;
pub mod syntax_kind;

pub use navigate::Step;
pub use parser::parse;
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, YamlLang};

use rowan::GreenNode;

/// A parsed document that can be stored and shared.
///
/// Rowan's red nodes are `!Send`; the green tree underneath is an immutable,
/// reference-counted value, so that is what gets kept. A fresh
/// [`SyntaxNode`] view is cheap to create on demand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct YamlTree {
    green: GreenNode,
}

impl YamlTree {
    pub fn parse(source: &str) -> Self {
        let tokens = lexer::lex(source);
        Self {
            green: parser::Parser::new(&tokens).parse_green(),
        }
    }

    /// Root node view of the tree.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The node holding the data at `path`, see [`navigate::lookup`].
    pub fn lookup(&self, path: &[Step<'_>]) -> Option<SyntaxNode> {
        navigate::lookup(&self.syntax(), path)
    }

    /// The entry whose key `path` names. See [`navigate::lookup_entry`].
    pub fn lookup_entry(&self, path: &[Step<'_>]) -> Option<SyntaxNode> {
        navigate::lookup_entry(&self.syntax(), path)
    }

    /// Whether the document contains any value at all.
    pub fn is_empty(&self) -> bool {
        navigate::document_value(&self.syntax()).is_none()
    }
}
