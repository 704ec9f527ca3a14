//! The four reference literal forms used throughout rulebook documents.
//!
//! ```text
//! ctx:Security.Encryption#at-rest    context reference
//! aspect:SEC-01#L5                   aspect reference, optional level id
//! https://example.com                URL
//! md:*inline* markdown               inline markdown
//! ```
//!
//! The forms are disjoint, so [`Reference::parse`] can classify any string
//! without context.

use regex::Regex;
use std::sync::OnceLock;

/// The literal that marks a level as requiring CTO sign-off.
pub const CTO_CONTROL: &str = "ctx:Control.msg-CTO";

fn context_regex() -> &'static Regex {
    static CONTEXT_REGEX: OnceLock<Regex> = OnceLock::new();
    CONTEXT_REGEX.get_or_init(|| {
        Regex::new(r"^ctx:([\w-]+(?:\.[\w-]+)+)(?:#(\S+))?$").expect("Invalid context regex")
    })
}

fn aspect_regex() -> &'static Regex {
    static ASPECT_REGEX: OnceLock<Regex> = OnceLock::new();
    ASPECT_REGEX.get_or_init(|| {
        Regex::new(r"^aspect:([^#\s]+)(?:#([^#\s]+))?$").expect("Invalid aspect regex")
    })
}

fn url_regex() -> &'static Regex {
    static URL_REGEX: OnceLock<Regex> = OnceLock::new();
    URL_REGEX.get_or_init(|| Regex::new(r"^https?:\S+$").expect("Invalid URL regex"))
}

/// `ctx:<Namespace>.<Name>[#fragment]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextRef<'a> {
    /// Dotted path after `ctx:`, without the fragment.
    pub path: &'a str,
    pub fragment: Option<&'a str>,
}

impl<'a> ContextRef<'a> {
    pub fn parse(text: &'a str) -> Option<Self> {
        let captures = context_regex().captures(text)?;
        Some(Self {
            path: captures.get(1)?.as_str(),
            fragment: captures.get(2).map(|m| m.as_str()),
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.path.split('.')
    }

    /// Every way of cutting the path into a namespace and a name.
    ///
    /// `A.B.C` yields `("A", "B.C")` then `("A.B", "C")`.
    pub fn splits(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        let path = self.path;
        path.match_indices('.')
            .map(move |(i, _)| (&path[..i], &path[i + 1..]))
    }
}

/// `aspect:<Id>[#SubId]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRef<'a> {
    pub id: &'a str,
    pub sub_id: Option<&'a str>,
}

impl<'a> AspectRef<'a> {
    pub fn parse(text: &'a str) -> Option<Self> {
        let captures = aspect_regex().captures(text)?;
        Some(Self {
            id: captures.get(1)?.as_str(),
            sub_id: captures.get(2).map(|m| m.as_str()),
        })
    }
}

/// Any recognised reference literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    Context(ContextRef<'a>),
    Aspect(AspectRef<'a>),
    Url(&'a str),
    /// Markdown text after the `md:` prefix.
    Markdown(&'a str),
}

impl<'a> Reference<'a> {
    pub fn parse(text: &'a str) -> Option<Self> {
        if let Some(context) = ContextRef::parse(text) {
            Some(Reference::Context(context))
        } else if let Some(aspect) = AspectRef::parse(text) {
            Some(Reference::Aspect(aspect))
        } else if url_regex().is_match(text) {
            Some(Reference::Url(text))
        } else {
            text.strip_prefix("md:").map(Reference::Markdown)
        }
    }
}

pub fn is_context_ref(text: &str) -> bool {
    context_regex().is_match(text)
}

pub fn is_aspect_ref(text: &str) -> bool {
    aspect_regex().is_match(text)
}
