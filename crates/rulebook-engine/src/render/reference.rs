use html_escape::{encode_double_quoted_attribute, encode_text};

use super::markdown::MarkdownRenderer;
use crate::reference::{AspectRef, ContextRef, Reference};

/// HTML for a reference literal, or `None` when it is not one.
pub fn reference_html(markdown: &dyn MarkdownRenderer, literal: &str) -> Option<String> {
    let html = match Reference::parse(literal)? {
        Reference::Context(context) => context_link(&context),
        Reference::Aspect(aspect) => aspect_link(&aspect),
        Reference::Url(url) => format!(
            r#"<a class="url" href="{}">{}</a>"#,
            encode_double_quoted_attribute(url),
            encode_text(url)
        ),
        Reference::Markdown(text) => markdown.render_inline(text),
    };
    Some(html)
}

/// Anchor id a context entry is linked to.
pub fn context_anchor(context: &ContextRef<'_>) -> String {
    let mut anchor = String::from("ctx");
    for segment in context.segments() {
        anchor.push('-');
        anchor.push_str(segment);
    }
    anchor
}

/// Anchor id of an aspect, or of one of its levels.
pub fn aspect_anchor(id: &str, sub_id: Option<&str>) -> String {
    match sub_id {
        Some(sub_id) => format!("{id}-{sub_id}"),
        None => id.to_string(),
    }
}

fn context_link(context: &ContextRef<'_>) -> String {
    let mut label = context.segments().collect::<Vec<_>>().join("▶");
    if let Some(fragment) = context.fragment {
        label.push_str(" # ");
        label.push_str(fragment);
    }
    format!(
        r##"<a class="ctx" href="#{}">{}</a>"##,
        encode_double_quoted_attribute(&context_anchor(context)),
        encode_text(&label)
    )
}

fn aspect_link(aspect: &AspectRef<'_>) -> String {
    let label = match aspect.sub_id {
        Some(sub_id) => format!("{}#{sub_id}", aspect.id),
        None => aspect.id.to_string(),
    };
    format!(
        r##"<a class="aspect" href="#{}">{}</a>"##,
        encode_double_quoted_attribute(&aspect_anchor(aspect.id, aspect.sub_id)),
        encode_text(&label)
    )
}
