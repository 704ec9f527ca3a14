//! Card layout: header, assessment ladder and relation columns.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::Generator;
use super::reference::aspect_anchor;
use crate::error::{ErrorKind, ParseError};
use crate::markup::MarkupBuilder;
use crate::models::{Aspect, AssessmentLevel, Level, Obligation, RelationKind};
use crate::reference::CTO_CONTROL;
use crate::repository::Artifact;
use crate::schema::FieldPath;

/// Relation rows per column. The second column starts at `Demand`.
const RELATION_COLUMNS: [&[RelationKind]; 2] = [
    &[
        RelationKind::Scope,
        RelationKind::Context,
        RelationKind::Support,
    ],
    &[
        RelationKind::Demand,
        RelationKind::Responsible,
        RelationKind::SeeAlso,
    ],
];

/// Who has to sign off a level, derived from CTO control statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tier {
    Must,
    Should,
    May,
    Wont,
    None,
}

impl Tier {
    fn label(self) -> &'static str {
        match self {
            Tier::Must => "MUST",
            Tier::Should => "SHOULD",
            Tier::May => "MAY",
            Tier::Wont => "WONT",
            Tier::None => "NONE",
        }
    }

    fn class(self) -> &'static str {
        match self {
            Tier::Must => "must",
            Tier::Should => "should",
            Tier::May => "may",
            Tier::Wont => "wont",
            Tier::None => "none",
        }
    }
}

impl From<Obligation> for Tier {
    fn from(obligation: Obligation) -> Self {
        match obligation {
            Obligation::Must => Tier::Must,
            Obligation::Should => Tier::Should,
            Obligation::May => Tier::May,
            Obligation::Wont => Tier::Wont,
        }
    }
}

/// Tier of every populated level, highest level first.
///
/// A level's own CTO statement sets its tier; otherwise it inherits the
/// tier of the level above. MUST never passes below the level that set it.
pub(crate) fn tiers(aspect: &Aspect) -> Vec<(Level, Tier)> {
    let mut carry = Tier::None;
    aspect
        .levels_descending()
        .map(|(level, data)| {
            let tier = cto_obligation(data).map_or(carry, Tier::from);
            carry = if tier == Tier::Must { Tier::None } else { tier };
            (level, tier)
        })
        .collect()
}

fn cto_obligation(data: &AssessmentLevel) -> Option<Obligation> {
    data.statements().iter().find_map(|statement| {
        statement
            .entries()
            .find(|(_, target)| *target == CTO_CONTROL)
            .map(|(obligation, _)| obligation)
    })
}

pub(super) fn aspect(
    generator: &Generator<'_>,
    markup: &mut MarkupBuilder,
    aspect: &Artifact<Aspect>,
) -> Result<(), ParseError> {
    let value = &aspect.value;
    markup.try_group(
        format!(
            r#"<section class="aspect card" id="{}">"#,
            encode_double_quoted_attribute(&value.id)
        ),
        "</section>",
        |m| {
            title(m, value);
            header(generator, m, value);
            assessment(generator, m, aspect)?;
            relations(generator, m, aspect)
        },
    )
}

fn title(markup: &mut MarkupBuilder, aspect: &Aspect) {
    let icons: String = aspect
        .icons
        .iter()
        .flatten()
        .map(|icon| format!(r#" <i class="icon icon-{}"></i>"#, encode_double_quoted_attribute(icon)))
        .collect();
    markup.add(format!(
        r#"<h2 class="title"><span class="id">{}</span> {}{icons}</h2>"#,
        encode_text(&aspect.id),
        encode_text(&aspect.name)
    ));
}

fn header(generator: &Generator<'_>, markup: &mut MarkupBuilder, aspect: &Aspect) {
    markup.group(r#"<div class="header">"#, "</div>", |m| {
        m.group(r#"<div class="objective">"#, "</div>", |m| {
            generator.block_markdown(m, &aspect.objective);
        });
        if let Some(editing) = &aspect.editing {
            m.group(r#"<dl class="editing">"#, "</dl>", |m| {
                m.add(format!("<dt>Created</dt><dd>{}</dd>", editing.created));
                m.add(format!("<dt>Modified</dt><dd>{}</dd>", editing.modified));
            });
        }
        if let Some(validity) = &aspect.validity {
            m.group(r#"<dl class="validity">"#, "</dl>", |m| {
                m.add(format!("<dt>From</dt><dd>{}</dd>", validity.from));
                m.add(format!(
                    "<dt>Until</dt><dd>{}</dd>",
                    encode_text(&validity.until.to_string())
                ));
            });
        }
    });
}

fn assessment(
    generator: &Generator<'_>,
    markup: &mut MarkupBuilder,
    aspect: &Artifact<Aspect>,
) -> Result<(), ParseError> {
    let value = &aspect.value;
    if value.assessment.is_empty() {
        return Ok(());
    }

    let space = space_labels(aspect)?;
    let tiers = tiers(value);

    markup.try_group(r#"<div class="assessment">"#, "</div>", |m| {
        match space {
            Some((top, bottom)) => {
                m.group(r#"<div class="space">"#, "</div>", |m| {
                    m.add(format!(r#"<span class="top">{}</span>"#, encode_text(top)));
                    m.add(format!(r#"<span class="bottom">{}</span>"#, encode_text(bottom)));
                });
            }
            None => {
                m.add(r#"<div class="space empty"></div>"#);
            }
        }

        for ((level, data), (_, tier)) in value.levels_descending().zip(tiers) {
            level_block(generator, m, aspect, level, data, tier)?;
        }
        Ok(())
    })
}

/// Top and bottom labels of the space split, taken from the first two
/// Optimize labels from the highest level down. `None` below two levels.
fn space_labels(aspect: &Artifact<Aspect>) -> Result<Option<(&str, &str)>, ParseError> {
    let value = &aspect.value;
    let populated = value.assessment.len();
    if populated < 2 {
        return Ok(None);
    }

    let mut labels = value
        .levels_descending()
        .filter_map(|(_, data)| data.optimize.as_deref());
    match (labels.next(), labels.next()) {
        (Some(top), Some(bottom)) => Ok(Some((top, bottom))),
        _ => Err(aspect.error(
            ErrorKind::Generation,
            format!(
                "aspect `{}` has {populated} assessment levels but fewer than two Optimize labels",
                value.id
            ),
            &FieldPath::root().key("Assessment"),
        )),
    }
}

fn level_block(
    generator: &Generator<'_>,
    markup: &mut MarkupBuilder,
    aspect: &Artifact<Aspect>,
    level: Level,
    data: &AssessmentLevel,
    tier: Tier,
) -> Result<(), ParseError> {
    let anchor = aspect_anchor(&aspect.value.id, Some(&data.id));
    markup.try_group(
        format!(
            r#"<div class="level tier-{}" id="{}">"#,
            tier.class(),
            encode_double_quoted_attribute(&anchor)
        ),
        "</div>",
        |m| {
            m.add(format!(
                r#"<div class="rank">{level} <span class="tier">{}</span></div>"#,
                tier.label()
            ));
            row(m, "what", "What", &generator.inline_markdown(&data.what));
            if let Some(why) = &data.why {
                row(m, "why", "Why", &generator.inline_markdown(why));
            }
            if !data.statements().is_empty() {
                let assess = assess_list(generator, aspect, level, data)?;
                row(m, "assess", "Assess", &assess);
            }
            if let Some(sota) = &data.sota {
                row(m, "sota", "SotA", &generator.inline_markdown(sota));
            }
            Ok(())
        },
    )
}

/// `ref: TAG` per statement, comma separated.
fn assess_list(
    generator: &Generator<'_>,
    aspect: &Artifact<Aspect>,
    level: Level,
    data: &AssessmentLevel,
) -> Result<String, ParseError> {
    let mut entries = Vec::new();
    for (i, statement) in data.statements().iter().enumerate() {
        let Some((obligation, target)) = statement.primary() else {
            continue;
        };
        let path = FieldPath::root()
            .key("Assessment")
            .key(level.to_string())
            .key("Assess")
            .index(i)
            .key(obligation.tag());
        let link = generator.reference(aspect, target, &path)?;
        entries.push(format!("{link}: {obligation}"));
    }
    Ok(entries.join(", "))
}

fn relations(
    generator: &Generator<'_>,
    markup: &mut MarkupBuilder,
    aspect: &Artifact<Aspect>,
) -> Result<(), ParseError> {
    let relations = aspect.value.relations();
    if relations.is_empty() {
        return Ok(());
    }

    markup.try_group(r#"<div class="relations">"#, "</div>", |m| {
        for column in RELATION_COLUMNS {
            m.try_group(r#"<div class="column">"#, "</div>", |m| {
                for &kind in column {
                    let mut links = Vec::new();
                    for (i, relation) in relations.iter().enumerate() {
                        if relation.kind() != kind {
                            continue;
                        }
                        let path = FieldPath::root().key("Relations").index(i).key(kind.key());
                        links.push(generator.reference(aspect, relation.target(), &path)?);
                    }
                    if !links.is_empty() {
                        row(m, &kind.key().to_lowercase(), kind.key(), &links.join(", "));
                    }
                }
                Ok(())
            })?;
        }
        Ok(())
    })
}

fn row(markup: &mut MarkupBuilder, class: &str, label: &str, value: &str) {
    markup.add(format!(
        r#"<div class="row {class}"><span class="label">{label}</span><span class="value">{value}</span></div>"#
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RulebookError;
    use crate::models::{AssessStatement, Relation};
    use crate::render::Format;
    use crate::render::tests::{render, repo_with};
    use crate::tests::{bare_aspect, bare_level, level, network_aspect, sample_aspect};
    use pretty_assertions::assert_eq;

    fn aspect_with_levels(levels: &[(u8, Option<&str>)]) -> Aspect {
        let mut aspect = bare_aspect("A");
        for &(rank, optimize) in levels {
            let mut data = bare_level(&format!("L{rank}"), "x");
            data.optimize = optimize.map(str::to_string);
            aspect.assessment.insert(level(rank), data);
        }
        aspect
    }

    fn cto(data: &mut AssessmentLevel, obligation: Obligation) {
        data.assess = Some(vec![AssessStatement::new(obligation, CTO_CONTROL)]);
    }

    #[test]
    fn levels_render_highest_first() {
        let aspect = aspect_with_levels(&[(2, Some("a")), (5, Some("b")), (0, None)]);
        let body = render(&repo_with(vec![aspect]), Format::Card).unwrap();
        let positions: Vec<usize> = ["Level-5", "Level-2", "Level-0"]
            .iter()
            .map(|key| body.find(key).unwrap())
            .collect();
        assert!(positions.is_sorted(), "{body}");
    }

    #[test]
    fn space_pairs_first_two_optimize_labels() {
        let body = render(&repo_with(vec![sample_aspect()]), Format::Card).unwrap();
        assert!(body.contains(r#"<span class="top">Speed</span>"#), "{body}");
        assert!(body.contains(r#"<span class="bottom">Cost</span>"#), "{body}");
    }

    #[test]
    fn single_level_gets_empty_space() {
        let aspect = aspect_with_levels(&[(3, Some("Speed"))]);
        let body = render(&repo_with(vec![aspect]), Format::Card).unwrap();
        assert!(body.contains(r#"<div class="space empty"></div>"#));
        assert!(!body.contains("Speed"));
    }

    #[test]
    fn missing_optimize_labels_fail() {
        let aspect = aspect_with_levels(&[(3, Some("Speed")), (1, None)]);
        let error = match render(&repo_with(vec![aspect]), Format::Card) {
            Err(RulebookError::Parse(error)) => error,
            other => panic!("expected a generation error, got {other:?}"),
        };
        assert_eq!(error.kind, ErrorKind::Generation);
        assert_eq!(
            error.message,
            "aspect `A` has 2 assessment levels but fewer than two Optimize labels"
        );
    }

    #[test]
    fn must_tier_stays_on_its_level() {
        let mut aspect = aspect_with_levels(&[(5, None), (4, None), (3, None), (2, None), (1, None), (0, None)]);
        cto(aspect.assessment.get_mut(&level(5)).unwrap(), Obligation::Must);

        let tiers: Vec<(u8, Tier)> = tiers(&aspect)
            .into_iter()
            .map(|(level, tier)| (level.rank(), tier))
            .collect();
        assert_eq!(
            tiers,
            vec![
                (5, Tier::Must),
                (4, Tier::None),
                (3, Tier::None),
                (2, Tier::None),
                (1, Tier::None),
                (0, Tier::None),
            ]
        );
    }

    #[test]
    fn weaker_tiers_propagate_until_overridden() {
        let mut aspect = aspect_with_levels(&[(8, None), (6, None), (3, None), (2, None), (1, None)]);
        cto(aspect.assessment.get_mut(&level(6)).unwrap(), Obligation::Should);
        cto(aspect.assessment.get_mut(&level(2)).unwrap(), Obligation::Must);
        // Other statements do not count
        aspect
            .assessment
            .get_mut(&level(8))
            .unwrap()
            .assess = Some(vec![AssessStatement::new(Obligation::Must, "ctx:Role.Ops")]);

        let tiers: Vec<Tier> = tiers(&aspect).into_iter().map(|(_, tier)| tier).collect();
        assert_eq!(
            tiers,
            vec![Tier::None, Tier::Should, Tier::Should, Tier::Must, Tier::None]
        );
    }

    #[test]
    fn cto_under_a_secondary_key_sets_the_tier() {
        let mut aspect = aspect_with_levels(&[(4, None), (3, None)]);
        aspect.assessment.get_mut(&level(4)).unwrap().assess = Some(vec![AssessStatement {
            must: Some("ctx:Role.Ops".into()),
            may: Some(CTO_CONTROL.into()),
            ..AssessStatement::default()
        }]);

        let tiers: Vec<Tier> = tiers(&aspect).into_iter().map(|(_, tier)| tier).collect();
        assert_eq!(tiers, vec![Tier::May, Tier::May]);
    }

    #[test]
    fn relations_split_before_demand() {
        let mut aspect = bare_aspect("A");
        aspect.relations = Some(vec![
            Relation::Demand("ctx:Role.Ops".into()),
            Relation::Context("ctx:Security.Keys".into()),
            Relation::Scope("aspect:B".into()),
            Relation::Context("ctx:Security.Encryption".into()),
        ]);
        let body = render(&repo_with(vec![aspect]), Format::Card).unwrap();
        insta::assert_snapshot!(body.split_once("</header>\n").unwrap().1, @r##"
        <section class="aspect card" id="A">
          <h2 class="title"><span class="id">A</span> A name</h2>
          <div class="header">
            <div class="objective">
              <p>A objective</p>
            </div>
          </div>
          <div class="relations">
            <div class="column">
              <div class="row scope"><span class="label">Scope</span><span class="value"><a class="aspect" href="#B">B</a></span></div>
              <div class="row context"><span class="label">Context</span><span class="value"><a class="ctx" href="#ctx-Security-Keys">Security▶Keys</a>, <a class="ctx" href="#ctx-Security-Encryption">Security▶Encryption</a></span></div>
            </div>
            <div class="column">
              <div class="row demand"><span class="label">Demand</span><span class="value"><a class="ctx" href="#ctx-Role-Ops">Role▶Ops</a></span></div>
            </div>
          </div>
        </section>
        "##);
    }

    #[test]
    fn full_card() {
        let body = render(&repo_with(vec![network_aspect()]), Format::Card).unwrap();
        insta::assert_snapshot!(body.split_once("</header>\n").unwrap().1, @r##"
        <section class="aspect card" id="NET-01">
          <h2 class="title"><span class="id">NET-01</span> Network</h2>
          <div class="header">
            <div class="objective">
              <p>Segment the network.</p>
            </div>
          </div>
          <div class="assessment">
            <div class="space empty"></div>
            <div class="level tier-none" id="NET-01-L3">
              <div class="rank">Level-3 <span class="tier">NONE</span></div>
              <div class="row what"><span class="label">What</span><span class="value">Use firewalls</span></div>
            </div>
          </div>
          <div class="relations">
            <div class="column">
            </div>
            <div class="column">
              <div class="row see-also"><span class="label">See-Also</span><span class="value"><a class="aspect" href="#SEC-01-L5">SEC-01#L5</a></span></div>
            </div>
          </div>
        </section>
        "##);
    }

    #[test]
    fn assess_row_lists_references_with_tags() {
        let body = render(&repo_with(vec![sample_aspect()]), Format::Card).unwrap();
        assert!(body.contains(
            r##"<span class="value"><a class="ctx" href="#ctx-Control-msg-CTO">Control▶msg-CTO</a>: MUST, <a class="ctx" href="#ctx-Security-Keys">Security▶Keys</a>: SHOULD</span>"##
        ), "{body}");
        assert!(body.contains(r#"<div class="level tier-must" id="SEC-01-L5">"#));
        assert!(body.contains(r#"<div class="level tier-none" id="SEC-01-L2">"#));
        assert!(body.contains(r#"<i class="icon icon-lock"></i>"#));
    }
}
