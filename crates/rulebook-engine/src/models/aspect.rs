use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::common::{Editing, Validity};

/// One policy topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Aspect {
    pub id: String,
    pub name: String,
    /// Markdown.
    pub objective: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing: Option<Editing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity: Option<Validity>,
    pub assessment: BTreeMap<Level, AssessmentLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<Vec<Relation>>,
}

impl Aspect {
    /// Populated levels, highest first.
    pub fn levels_descending(&self) -> impl Iterator<Item = (Level, &AssessmentLevel)> {
        self.assessment.iter().rev().map(|(level, data)| (*level, data))
    }

    pub fn level_by_id(&self, id: &str) -> Option<&AssessmentLevel> {
        self.assessment.values().find(|level| level.id == id)
    }

    pub fn relations(&self) -> &[Relation] {
        self.relations.as_deref().unwrap_or_default()
    }
}

/// One of the ten assessment rungs, `Level-0` to `Level-9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u8);

impl Level {
    pub const MAX: u8 = 9;

    pub fn new(rank: u8) -> Option<Self> {
        (rank <= Self::MAX).then_some(Self(rank))
    }

    pub fn rank(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level-{}", self.0)
    }
}

impl FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("Level-").ok_or(())?;
        if digits.len() != 1 {
            return Err(());
        }
        digits.parse().ok().and_then(Level::new).ok_or(())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssessmentLevel {
    pub id: String,
    /// Markdown.
    pub what: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    #[serde(rename = "SotA", skip_serializing_if = "Option::is_none")]
    pub sota: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assess: Option<Vec<AssessStatement>>,
}

impl AssessmentLevel {
    pub fn statements(&self) -> &[AssessStatement] {
        self.assess.as_deref().unwrap_or_default()
    }
}

/// Obligation strength of an assess statement, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Obligation {
    Must,
    Should,
    May,
    Wont,
}

impl Obligation {
    /// Priority order used whenever a statement sets more than one key.
    pub const ALL: [Obligation; 4] = [
        Obligation::Must,
        Obligation::Should,
        Obligation::May,
        Obligation::Wont,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Obligation::Must => "MUST",
            Obligation::Should => "SHOULD",
            Obligation::May => "MAY",
            Obligation::Wont => "WONT",
        }
    }
}

impl fmt::Display for Obligation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A context reference with an obligation. Valid input sets exactly one key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssessStatement {
    #[serde(rename = "MUST", skip_serializing_if = "Option::is_none")]
    pub must: Option<String>,
    #[serde(rename = "SHOULD", skip_serializing_if = "Option::is_none")]
    pub should: Option<String>,
    #[serde(rename = "MAY", skip_serializing_if = "Option::is_none")]
    pub may: Option<String>,
    #[serde(rename = "WONT", skip_serializing_if = "Option::is_none")]
    pub wont: Option<String>,
}

impl AssessStatement {
    pub fn new(obligation: Obligation, reference: impl Into<String>) -> Self {
        let mut statement = Self::default();
        *statement.slot_mut(obligation) = Some(reference.into());
        statement
    }

    pub fn get(&self, obligation: Obligation) -> Option<&str> {
        match obligation {
            Obligation::Must => self.must.as_deref(),
            Obligation::Should => self.should.as_deref(),
            Obligation::May => self.may.as_deref(),
            Obligation::Wont => self.wont.as_deref(),
        }
    }

    fn slot_mut(&mut self, obligation: Obligation) -> &mut Option<String> {
        match obligation {
            Obligation::Must => &mut self.must,
            Obligation::Should => &mut self.should,
            Obligation::May => &mut self.may,
            Obligation::Wont => &mut self.wont,
        }
    }

    /// Every populated key, in priority order.
    pub fn entries(&self) -> impl Iterator<Item = (Obligation, &str)> {
        Obligation::ALL
            .into_iter()
            .filter_map(|obligation| self.get(obligation).map(|r| (obligation, r)))
    }

    /// The key that counts: the first populated one by priority.
    pub fn primary(&self) -> Option<(Obligation, &str)> {
        self.entries().next()
    }
}

/// Which relation a [`Relation`] expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Scope,
    Support,
    Demand,
    Context,
    Responsible,
    SeeAlso,
}

impl RelationKind {
    pub const ALL: [RelationKind; 6] = [
        RelationKind::Scope,
        RelationKind::Support,
        RelationKind::Demand,
        RelationKind::Context,
        RelationKind::Responsible,
        RelationKind::SeeAlso,
    ];

    pub fn key(self) -> &'static str {
        match self {
            RelationKind::Scope => "Scope",
            RelationKind::Support => "Support",
            RelationKind::Demand => "Demand",
            RelationKind::Context => "Context",
            RelationKind::Responsible => "Responsible",
            RelationKind::SeeAlso => "See-Also",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// A typed link from an aspect to another aspect, a context entry or the
/// outside world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Relation {
    /// Aspect reference.
    Scope(String),
    Support(String),
    Demand(String),
    Context(String),
    Responsible(String),
    /// Any of the four reference forms.
    #[serde(rename = "See-Also")]
    SeeAlso(String),
}

impl Relation {
    pub fn new(kind: RelationKind, target: String) -> Self {
        match kind {
            RelationKind::Scope => Relation::Scope(target),
            RelationKind::Support => Relation::Support(target),
            RelationKind::Demand => Relation::Demand(target),
            RelationKind::Context => Relation::Context(target),
            RelationKind::Responsible => Relation::Responsible(target),
            RelationKind::SeeAlso => Relation::SeeAlso(target),
        }
    }

    pub fn kind(&self) -> RelationKind {
        match self {
            Relation::Scope(_) => RelationKind::Scope,
            Relation::Support(_) => RelationKind::Support,
            Relation::Demand(_) => RelationKind::Demand,
            Relation::Context(_) => RelationKind::Context,
            Relation::Responsible(_) => RelationKind::Responsible,
            Relation::SeeAlso(_) => RelationKind::SeeAlso,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Relation::Scope(target)
            | Relation::Support(target)
            | Relation::Demand(target)
            | Relation::Context(target)
            | Relation::Responsible(target)
            | Relation::SeeAlso(target) => target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Level-0", Some(0))]
    #[case("Level-9", Some(9))]
    #[case("Level-10", None)]
    #[case("Level-", None)]
    #[case("level-1", None)]
    #[case("Level-+1", None)]
    fn level_keys(#[case] key: &str, #[case] rank: Option<u8>) {
        assert_eq!(key.parse::<Level>().ok().map(Level::rank), rank);
    }

    #[test]
    fn level_displays_as_key() {
        assert_eq!(Level::new(5).unwrap().to_string(), "Level-5");
        assert_eq!(Level::new(10), None);
    }

    #[test]
    fn statement_priority_prefers_must() {
        let statement = AssessStatement {
            may: Some("ctx:A.May".into()),
            should: Some("ctx:A.Should".into()),
            ..Default::default()
        };
        assert_eq!(statement.primary(), Some((Obligation::Should, "ctx:A.Should")));
        assert_eq!(statement.entries().count(), 2);
        assert_eq!(AssessStatement::default().primary(), None);
    }

    #[test]
    fn relation_kind_keys_round_trip() {
        for kind in RelationKind::ALL {
            assert_eq!(RelationKind::from_key(kind.key()), Some(kind));
            assert_eq!(Relation::new(kind, "x".into()).kind(), kind);
        }
        assert_eq!(RelationKind::from_key("SeeAlso"), None);
    }

    #[test]
    fn serializes_with_document_keys() {
        let relation = Relation::SeeAlso("https://example.com".into());
        let statement = AssessStatement::new(Obligation::Must, "ctx:A.B");
        assert_eq!(
            serde_json::to_string(&relation).unwrap(),
            r#"{"See-Also":"https://example.com"}"#
        );
        assert_eq!(
            serde_json::to_string(&statement).unwrap(),
            r#"{"MUST":"ctx:A.B"}"#
        );
    }
}
