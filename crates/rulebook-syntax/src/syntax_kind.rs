//! SyntaxKind enum for all tokens and nodes in the YAML CST.
//!
//! Tokens and nodes share one enum, rust-analyzer style. Every byte of the
//! source ends up in exactly one token of the tree.

/// All syntax kinds for the YAML CST.
///
/// The `repr(u16)` lets the kind round-trip through rowan's raw kind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Horizontal whitespace (spaces, tabs)
    WHITESPACE,
    /// Line ending
    NEWLINE,
    /// `# ...` up to the end of the line
    COMMENT,
    /// `:` mapping value indicator (or part of a plain scalar)
    COLON,
    /// `-` sequence entry indicator (or part of a plain scalar)
    DASH,
    /// `---` document start marker
    DOC_START,
    /// `[`
    LBRACKET,
    /// `]`
    RBRACKET,
    /// `{`
    LBRACE,
    /// `}`
    RBRACE,
    /// `,` flow separator
    COMMA,
    /// `|` literal block scalar indicator
    PIPE,
    /// `>` folded block scalar indicator
    GT,
    /// Single or double quoted string, quotes included
    QUOTED,
    /// Run of plain characters
    TEXT,
    /// End of file marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root document node
    ROOT,
    /// Block mapping
    MAPPING,
    /// One `key: value` pair of a mapping
    ENTRY,
    /// The key of an entry
    KEY,
    /// Block sequence
    SEQUENCE,
    /// One `- value` item of a sequence
    ITEM,
    /// Plain or quoted scalar, possibly spanning lines
    SCALAR,
    /// `|` or `>` scalar with its indented body
    BLOCK_SCALAR,
    /// `[a, b]`
    FLOW_SEQUENCE,
    /// `{a: b}`
    FLOW_MAPPING,

    /// Error recovery node
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Whitespace, newlines and comments.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE | Self::COMMENT)
    }

    /// Node kinds that can stand as the value of an entry or item.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            Self::MAPPING
                | Self::SEQUENCE
                | Self::SCALAR
                | Self::BLOCK_SCALAR
                | Self::FLOW_SEQUENCE
                | Self::FLOW_MAPPING
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum YamlLang {}

impl rowan::Language for YamlLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<YamlLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<YamlLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<YamlLang>;
