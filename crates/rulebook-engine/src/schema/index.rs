use std::collections::BTreeMap;

use serde_yaml::Value;

use super::{Checker, DocumentKind, Schema};
use crate::models::{Author, ContextMap, Editing, Index, Logo, Validity};

impl Schema for Index {
    const KIND: DocumentKind = DocumentKind::Index;

    fn check(value: &Value, c: &mut Checker<'_>) -> Option<Self> {
        let fields = c.object(
            value,
            &[
                "Id",
                "Name",
                "Version",
                "Description",
                "Author",
                "Editing",
                "Validity",
                "Logo",
                "Context",
            ],
        )?;

        let id = c.required(&fields, "Id", Checker::string);
        let name = c.required(&fields, "Name", Checker::string);
        let version = c.required(&fields, "Version", Checker::text);
        let description = c.required(&fields, "Description", Checker::string);
        let author = c.required(&fields, "Author", author);
        let editing = c.required(&fields, "Editing", editing);
        let validity = c.required(&fields, "Validity", validity);
        let logo = c.optional(&fields, "Logo", logo);
        let context = if fields.present("Context") {
            c.optional(&fields, "Context", context_map)
                .map(Option::unwrap_or_default)
        } else {
            c.required(&fields, "Context", context_map)
        };

        Some(Index {
            id: id?,
            name: name?,
            version: version?,
            description: description?,
            author: author?,
            editing: editing?,
            validity: validity?,
            logo: logo?,
            context: context?,
        })
    }
}

fn author(c: &mut Checker<'_>, value: &Value) -> Option<Author> {
    let fields = c.object(value, &["Name", "Email", "Web"])?;
    let name = c.required(&fields, "Name", Checker::string);
    let email = c.optional(&fields, "Email", Checker::string);
    let web = c.optional(&fields, "Web", Checker::string);
    Some(Author {
        name: name?,
        email: email?,
        web: web?,
    })
}

pub(super) fn editing(c: &mut Checker<'_>, value: &Value) -> Option<Editing> {
    let fields = c.object(value, &["Created", "Modified"])?;
    let created = c.required(&fields, "Created", Checker::date);
    let modified = c.required(&fields, "Modified", Checker::date);
    Some(Editing {
        created: created?,
        modified: modified?,
    })
}

pub(super) fn validity(c: &mut Checker<'_>, value: &Value) -> Option<Validity> {
    let fields = c.object(value, &["From", "Until"])?;
    let from = c.required(&fields, "From", Checker::date);
    let until = c.required(&fields, "Until", Checker::until);
    Some(Validity {
        from: from?,
        until: until?,
    })
}

fn logo(c: &mut Checker<'_>, value: &Value) -> Option<Logo> {
    let fields = c.object(value, &["Light", "Dark"])?;
    let light = c.required(&fields, "Light", Checker::string);
    let dark = c.required(&fields, "Dark", Checker::string);
    Some(Logo {
        light: light?,
        dark: dark?,
    })
}

/// Namespace -> name -> text. An empty `Context:` is an empty map.
fn context_map(c: &mut Checker<'_>, value: &Value) -> Option<ContextMap> {
    let namespaces = c.mapping(value)?;
    let mut context = ContextMap::new();
    let mut ok = true;

    for (key, names) in namespaces {
        let Some(namespace) = key.as_str() else {
            c.error("context namespaces must be strings");
            ok = false;
            continue;
        };
        match c.at_key(namespace, |c| context_names(c, names)) {
            Some(entries) => {
                context.insert(namespace.to_string(), entries);
            }
            None => ok = false,
        }
        if c.stopped() {
            return None;
        }
    }

    ok.then_some(context)
}

fn context_names(c: &mut Checker<'_>, value: &Value) -> Option<BTreeMap<String, String>> {
    let names = c.mapping(value)?;
    let mut entries = BTreeMap::new();
    let mut ok = true;

    for (key, text) in names {
        let Some(name) = key.as_str() else {
            c.error("context names must be strings");
            ok = false;
            continue;
        };
        match c.at_key(name, |c| c.text(text)) {
            Some(text) => {
                entries.insert(name.to_string(), text);
            }
            None => ok = false,
        }
        if c.stopped() {
            return None;
        }
    }

    ok.then_some(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullSink;
    use crate::models::Until;
    use crate::schema::{Strictness, validate};
    use crate::tests::{INDEX_YAML, sample_index};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn check(text: &str) -> Result<Index, Vec<String>> {
        let value: Value = serde_yaml::from_str(text).unwrap();
        validate::<Index>(&value, Strictness::Exhaustive, &NullSink)
            .map_err(|errors| errors.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn valid_index_builds_model() {
        assert_eq!(check(INDEX_YAML), Ok(sample_index()));
    }

    #[test]
    fn version_may_be_a_number_or_string() {
        let quoted = INDEX_YAML.replace("Version: 1.2", "Version: \"1.2-rc1\"");
        assert_eq!(check(&quoted).unwrap().version, "1.2-rc1");
        assert_eq!(check(INDEX_YAML).unwrap().version, "1.2");
    }

    #[test]
    fn until_may_be_a_date() {
        let dated = INDEX_YAML.replace("Until: ...", "Until: 2025-12-31");
        let index = check(&dated).unwrap();
        assert_eq!(index.validity.until.to_string(), "2025-12-31");
        assert!(matches!(index.validity.until, Until::Date(_)));
    }

    #[test]
    fn empty_context_is_allowed() {
        let start = INDEX_YAML.find("Context:").unwrap();
        let empty = format!("{}Context:\n", &INDEX_YAML[..start]);
        assert!(check(&empty).unwrap().context.is_empty());
    }

    #[rstest]
    #[case("Id: RB", "Id: [RB]", "`Id`: expected a string, found a list")]
    #[case("Name: Security Rulebook\n", "", "`Name`: missing required field")]
    #[case("Created: 2024-01-15", "Created: 15/01/2024", "`Editing.Created`: expected a date (YYYY-MM-DD)")]
    #[case("Until: ...", "Until: forever", "`Validity.Until`: expected a date (YYYY-MM-DD) or `...`")]
    #[case("  Name: Jane Doe\n", "  Name: Jane Doe\n  Phone: 1\n", "`Author.Phone`: unknown field, expected one of: Name, Email, Web")]
    #[case("    Keys: Key management\n", "    Keys: [a]\n", "`Context.Security.Keys`: expected a string, found a list")]
    fn invalid_index(#[case] from: &str, #[case] to: &str, #[case] expected: &str) {
        let text = INDEX_YAML.replacen(from, to, 1);
        assert_eq!(check(&text), Err(vec![expected.to_string()]));
    }

    #[test]
    fn unknown_top_level_field() {
        let text = format!("{INDEX_YAML}Owner: someone\n");
        let errors = check(&text).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("`Owner`: unknown field"));
    }

    #[test]
    fn non_mapping_document() {
        assert_eq!(
            check("- just\n- a list\n"),
            Err(vec!["expected a mapping, found a list".to_string()])
        );
    }
}
