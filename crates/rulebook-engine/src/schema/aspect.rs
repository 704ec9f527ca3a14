use std::collections::BTreeMap;

use serde_yaml::Value;

use super::index::{editing, validity};
use super::{Checker, DocumentKind, Schema};
use crate::models::{
    Aspect, AssessStatement, AssessmentLevel, Level, Obligation, Relation, RelationKind,
};
use crate::reference::{Reference, is_aspect_ref, is_context_ref};

const CONTEXT_EXPECTED: &str = "a context reference (e.g. ctx:Foo.Bar.Quux)";
const ASPECT_EXPECTED: &str = "an aspect reference (e.g. aspect:Foo#Bar)";
const ANY_EXPECTED: &str = "a context, aspect, URL or markdown reference";

impl Schema for Aspect {
    const KIND: DocumentKind = DocumentKind::Aspect;

    fn check(value: &Value, c: &mut Checker<'_>) -> Option<Self> {
        let fields = c.object(
            value,
            &[
                "Id",
                "Name",
                "Objective",
                "Icons",
                "Editing",
                "Validity",
                "Assessment",
                "Relations",
            ],
        )?;

        let id = c.required(&fields, "Id", Checker::string);
        let name = c.required(&fields, "Name", Checker::string);
        let objective = c.required(&fields, "Objective", Checker::string);
        let icons = c.optional(&fields, "Icons", Checker::string_list);
        let editing = c.optional(&fields, "Editing", editing);
        let validity = c.optional(&fields, "Validity", validity);
        let assessment = if fields.present("Assessment") {
            c.optional(&fields, "Assessment", assessment)
                .map(Option::unwrap_or_default)
        } else {
            c.required(&fields, "Assessment", assessment)
        };
        let relations = c.optional(&fields, "Relations", |c, value| c.list(value, relation));

        Some(Aspect {
            id: id?,
            name: name?,
            objective: objective?,
            icons: icons?,
            editing: editing?,
            validity: validity?,
            assessment: assessment?,
            relations: relations?,
        })
    }
}

fn assessment(c: &mut Checker<'_>, value: &Value) -> Option<BTreeMap<Level, AssessmentLevel>> {
    let levels = c.mapping(value)?;
    let mut assessment = BTreeMap::new();
    let mut ok = true;

    for (key, data) in levels {
        let Some(key) = key.as_str() else {
            c.error("level keys must be strings");
            ok = false;
            continue;
        };
        let Ok(level) = key.parse::<Level>() else {
            c.at_key(key, |c| c.key_error("unknown field, expected Level-0 to Level-9"));
            ok = false;
            if c.stopped() {
                return None;
            }
            continue;
        };
        match c.at_key(key, |c| assessment_level(c, data)) {
            Some(data) => {
                assessment.insert(level, data);
            }
            None => ok = false,
        }
        if c.stopped() {
            return None;
        }
    }

    let unique = unique_level_ids(c, &assessment);
    (ok && unique).then_some(assessment)
}

/// Level ids are anchors, so they must not clash within an aspect.
fn unique_level_ids(c: &mut Checker<'_>, assessment: &BTreeMap<Level, AssessmentLevel>) -> bool {
    let mut seen: BTreeMap<&str, Level> = BTreeMap::new();
    let mut unique = true;
    for (level, data) in assessment {
        match seen.get(data.id.as_str()) {
            Some(first) => {
                let message = format!("duplicate level Id `{}`, already used by {first}", data.id);
                c.at_key(&level.to_string(), |c| c.at_key("Id", |c| c.error(message)));
                unique = false;
            }
            None => {
                seen.insert(data.id.as_str(), *level);
            }
        }
    }
    unique
}

fn assessment_level(c: &mut Checker<'_>, value: &Value) -> Option<AssessmentLevel> {
    let fields = c.object(value, &["Id", "What", "Why", "SotA", "Optimize", "Assess"])?;
    let id = c.required(&fields, "Id", Checker::string);
    let what = c.required(&fields, "What", Checker::string);
    let why = c.optional(&fields, "Why", Checker::string);
    let sota = c.optional(&fields, "SotA", Checker::string);
    let optimize = c.optional(&fields, "Optimize", Checker::string);
    let assess = c.optional(&fields, "Assess", |c, value| c.list(value, statement));

    Some(AssessmentLevel {
        id: id?,
        what: what?,
        why: why?,
        sota: sota?,
        optimize: optimize?,
        assess: assess?,
    })
}

fn statement(c: &mut Checker<'_>, value: &Value) -> Option<AssessStatement> {
    let keys = Obligation::ALL.map(Obligation::tag);
    let before = c.error_count();
    let fields = c.object(value, &keys)?;

    let context = |c: &mut Checker<'_>, value: &Value| {
        c.reference(value, is_context_ref, CONTEXT_EXPECTED)
    };
    let must = c.optional(&fields, "MUST", context);
    let should = c.optional(&fields, "SHOULD", context);
    let may = c.optional(&fields, "MAY", context);
    let wont = c.optional(&fields, "WONT", context);

    let statement = AssessStatement {
        must: must?,
        should: should?,
        may: may?,
        wont: wont?,
    };

    let populated: Vec<&str> = statement.entries().map(|(o, _)| o.tag()).collect();
    match populated.as_slice() {
        // Unknown keys were already reported
        [] if c.error_count() > before => None,
        [] => {
            c.error(format!("expected one of: {}", keys.join(", ")));
            None
        }
        [_] => Some(statement),
        [first, ..] => {
            c.warning(format!(
                "statement sets {}; only {first} is shown",
                populated.join(", ")
            ));
            Some(statement)
        }
    }
}

fn relation(c: &mut Checker<'_>, value: &Value) -> Option<Relation> {
    let keys = RelationKind::ALL.map(RelationKind::key);
    let before = c.error_count();
    let fields = c.object(value, &keys)?;

    let mut present = RelationKind::ALL
        .into_iter()
        .filter(|kind| fields.present(kind.key()));
    let (Some(kind), None) = (present.next(), present.next()) else {
        if c.error_count() == before {
            c.error(format!("expected exactly one of: {}", keys.join(", ")));
        }
        return None;
    };

    let target = c.required(&fields, kind.key(), |c, value| match kind {
        RelationKind::Scope => c.reference(value, is_aspect_ref, ASPECT_EXPECTED),
        RelationKind::SeeAlso => {
            c.reference(value, |text| Reference::parse(text).is_some(), ANY_EXPECTED)
        }
        _ => c.reference(value, is_context_ref, CONTEXT_EXPECTED),
    })?;

    Some(Relation::new(kind, target))
}
