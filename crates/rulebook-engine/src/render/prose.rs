//! Prose layout: one sentence per level.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::Generator;
use super::reference::aspect_anchor;
use crate::error::ParseError;
use crate::markup::MarkupBuilder;
use crate::models::{Aspect, AssessmentLevel, Level, Obligation};
use crate::repository::Artifact;
use crate::schema::FieldPath;

/// Obligations narrated in prose, in the order they are told. WONT is left out.
const NARRATED: [Obligation; 3] = [Obligation::Must, Obligation::Should, Obligation::May];

pub(super) fn aspect(
    generator: &Generator<'_>,
    markup: &mut MarkupBuilder,
    aspect: &Artifact<Aspect>,
) -> Result<(), ParseError> {
    let value = &aspect.value;
    markup.try_group(
        format!(
            r#"<section class="aspect prose" id="{}">"#,
            encode_double_quoted_attribute(&value.id)
        ),
        "</section>",
        |m| {
            m.add(format!(
                r#"<p><span class="id">{}</span> <strong>{}</strong>: {}</p>"#,
                encode_text(&value.id),
                encode_text(&value.name),
                generator.inline_markdown(&value.objective)
            ));

            let mut sentences = Vec::new();
            for (level, data) in value.levels_descending() {
                if let Some(sentence) = sentence(generator, aspect, level, data)? {
                    sentences.push((aspect_anchor(&value.id, Some(&data.id)), sentence));
                }
            }
            if !sentences.is_empty() {
                m.group(r#"<ul class="assessment">"#, "</ul>", |m| {
                    for (anchor, sentence) in sentences {
                        m.add(format!(
                            r#"<li id="{}">{sentence}</li>"#,
                            encode_double_quoted_attribute(&anchor)
                        ));
                    }
                });
            }
            Ok(())
        },
    )
}

/// The level as a sentence, or `None` when nothing is demanded of it.
fn sentence(
    generator: &Generator<'_>,
    aspect: &Artifact<Aspect>,
    level: Level,
    data: &AssessmentLevel,
) -> Result<Option<String>, ParseError> {
    let mut demands = Vec::new();
    for obligation in NARRATED {
        for (i, statement) in data.statements().iter().enumerate() {
            let Some((primary, target)) = statement.primary() else {
                continue;
            };
            if primary != obligation {
                continue;
            }
            let path = FieldPath::root()
                .key("Assessment")
                .key(level.to_string())
                .key("Assess")
                .index(i)
                .key(obligation.tag());
            let link = generator.reference(aspect, target, &path)?;
            demands.push(format!("{link} demands you {obligation}"));
        }
    }
    if demands.is_empty() {
        return Ok(None);
    }

    let mut text = format!(
        "{}: {}: {}",
        encode_text(&data.id),
        demands.join(", and "),
        generator.inline_markdown(&data.what)
    );
    if let Some(why) = &data.why {
        text.push_str(", because of ");
        text.push_str(&generator.inline_markdown(why));
    }
    if let Some(sota) = &data.sota {
        text.push_str(". For this you can use: ");
        text.push_str(&generator.inline_markdown(sota));
        text.push('.');
    }
    Ok(Some(text))
}
