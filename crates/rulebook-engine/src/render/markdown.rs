//! Markdown to HTML conversion for document text fields.

use pulldown_cmark::{Event, Options, Parser, html};

/// Converts markdown fields (objectives, level texts, `md:` references)
/// to HTML.
pub trait MarkdownRenderer {
    /// Block-level HTML.
    fn render(&self, markdown: &str) -> String;

    /// HTML for use inside a line: a single wrapping paragraph is removed.
    fn render_inline(&self, markdown: &str) -> String {
        strip_paragraph(&self.render(markdown)).to_string()
    }
}

/// pulldown-cmark with typographic punctuation and GFM line breaks.
#[derive(Debug, Default, Clone, Copy)]
pub struct CmarkRenderer;

impl CmarkRenderer {
    fn options() -> Options {
        Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
    }
}

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::options()).map(|event| match event {
            Event::SoftBreak => Event::HardBreak,
            other => other,
        });
        let mut out = String::new();
        html::push_html(&mut out, parser);
        out
    }
}

fn strip_paragraph(html: &str) -> &str {
    let trimmed = html.trim_end();
    match trimmed
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner,
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Keep **secrets** out.", "Keep <strong>secrets</strong> out.")]
    #[case("It's \"quoted\"", "It’s “quoted”")]
    #[case("one\ntwo", "one<br />\ntwo")]
    #[case("~~gone~~", "<del>gone</del>")]
    #[case("a < b", "a &lt; b")]
    fn inline(#[case] markdown: &str, #[case] expected: &str) {
        assert_eq!(CmarkRenderer.render_inline(markdown), expected);
    }

    #[test]
    fn multiple_paragraphs_stay_blocks() {
        assert_eq!(
            CmarkRenderer.render_inline("one\n\ntwo"),
            "<p>one</p>\n<p>two</p>"
        );
    }

    #[test]
    fn block_render_keeps_structure() {
        assert_eq!(
            CmarkRenderer.render("- a\n- b\n"),
            "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n"
        );
    }
}
