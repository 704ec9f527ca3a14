//! Model to HTML.
//!
//! [`Generator`] walks a validated [`Repository`] and writes body markup
//! through a [`MarkupBuilder`]. The body is then spliced into a page
//! [`Template`].
//!
//! ```text
//! Repository ──Generator──▶ body ──Template──▶ page
//!                 │
//!                 ├── prolog (index cover)
//!                 └── aspects, sorted by Id, as card or prose
//! ```

mod card;
mod markdown;
mod prose;
mod reference;
mod template;

use std::fmt;
use std::str::FromStr;

use html_escape::encode_text;

pub use markdown::{CmarkRenderer, MarkdownRenderer};
pub use reference::{aspect_anchor, context_anchor, reference_html};
pub use template::{DEFAULT_STYLESHEET, DEFAULT_TEMPLATE, Template, TemplateParts};

use crate::error::{ErrorKind, ParseError, RulebookError};
use crate::markup::MarkupBuilder;
use crate::models::{Aspect, Index};
use crate::repository::{Artifact, Repository};
use crate::schema::FieldPath;

/// How each aspect is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Header, coloured assessment ladder and relation columns.
    #[default]
    Card,
    /// Flowing text, one sentence per level.
    Prose,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Card, Format::Prose];

    pub fn name(self) -> &'static str {
        match self {
            Format::Card => "card",
            Format::Prose => "prose",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = RulebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| RulebookError::UnknownFormat(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: Format,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: Format::Card,
            indent: 2,
        }
    }
}

/// Renders one repository. Borrows everything, mutates nothing.
pub struct Generator<'a> {
    repo: &'a Repository,
    markdown: &'a dyn MarkdownRenderer,
    options: RenderOptions,
}

impl<'a> Generator<'a> {
    pub fn new(
        repo: &'a Repository,
        markdown: &'a dyn MarkdownRenderer,
        options: RenderOptions,
    ) -> Self {
        Self {
            repo,
            markdown,
            options,
        }
    }

    /// Body markup: the index cover, then every aspect in Id order.
    pub fn render_body(&self) -> Result<String, RulebookError> {
        let index = self.repo.require_index()?;
        let mut markup = MarkupBuilder::new(self.options.indent);

        self.prolog(&mut markup, &index.value);

        let mut aspects: Vec<&Artifact<Aspect>> = self.repo.aspects().iter().collect();
        aspects.sort_by(|a, b| a.value.id.cmp(&b.value.id));

        for aspect in aspects {
            match self.options.format {
                Format::Card => card::aspect(self, &mut markup, aspect)?,
                Format::Prose => prose::aspect(self, &mut markup, aspect)?,
            }
        }

        Ok(markup.finish())
    }

    fn prolog(&self, markup: &mut MarkupBuilder, index: &Index) {
        markup.group(r#"<header class="cover">"#, "</header>", |m| {
            m.add(format!(r#"<h1 class="title">{}</h1>"#, encode_text(&index.name)));
            m.add(format!(
                r#"<div class="version">Version {}</div>"#,
                encode_text(&index.version)
            ));
            m.group(r#"<div class="description">"#, "</div>", |m| {
                self.block_markdown(m, &index.description);
            });
        });
    }

    /// Block markdown, one builder line per output line.
    fn block_markdown(&self, markup: &mut MarkupBuilder, text: &str) {
        for line in self.markdown.render(text).lines() {
            markup.add(line);
        }
    }

    fn inline_markdown(&self, text: &str) -> String {
        self.markdown.render_inline(text)
    }

    /// Reference markup, or a generation error at `path` in `aspect`.
    fn reference(
        &self,
        aspect: &Artifact<Aspect>,
        literal: &str,
        path: &FieldPath,
    ) -> Result<String, ParseError> {
        reference_html(self.markdown, literal).ok_or_else(|| {
            aspect.error(
                ErrorKind::Generation,
                format!("bad reference `{literal}`"),
                path,
            )
        })
    }
}

/// Body markup spliced into a page.
pub fn render_page(
    repo: &Repository,
    markdown: &dyn MarkdownRenderer,
    options: RenderOptions,
    template: &Template,
    parts: &TemplateParts,
) -> Result<String, RulebookError> {
    let body = Generator::new(repo, markdown, options).render_body()?;
    Ok(template.render(parts, &body))
}
