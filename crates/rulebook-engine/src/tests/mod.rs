//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tempfile::TempDir;

use crate::diagnostics::DiagnosticSink;
use crate::models::{
    AssessStatement, Aspect, AssessmentLevel, Author, Editing, Index, Level, Obligation,
    Relation, Until, Validity,
};

pub const INDEX_YAML: &str = "\
Id: RB
Name: Security Rulebook
Version: 1.2
Description: |
  Rules for *keeping* secrets.
Author:
  Name: Jane Doe
  Email: jane@example.com
Editing:
  Created: 2024-01-15
  Modified: 2024-03-01
Validity:
  From: 2024-02-01
  Until: ...
Context:
  Security:
    Encryption: Encrypt data at rest and in transit
    Keys: Key management
  Control:
    msg-CTO: Sign-off by the CTO
  Role:
    Ops: Operations team
";

pub const ASPECT_YAML: &str = "\
Id: SEC-01
Name: Secrets
Objective: Keep **secrets** out of source control.
Icons: [lock]
Assessment:
  Level-5:
    Id: L5
    What: Rotate keys every 90 days
    Why: Limits exposure
    Optimize: Speed
    Assess:
      - MUST: ctx:Control.msg-CTO
      - SHOULD: ctx:Security.Keys
  Level-2:
    Id: L2
    What: Store keys in a vault
    SotA: HashiCorp Vault
    Optimize: Cost
    Assess:
      - MAY: ctx:Security.Encryption
Relations:
  - Scope: aspect:NET-01
  - Demand: ctx:Role.Ops
  - See-Also: https://example.com/secrets
";

pub const NETWORK_YAML: &str = "\
Id: NET-01
Name: Network
Objective: Segment the network.
Assessment:
  Level-3:
    Id: L3
    What: Use firewalls
Relations:
  - See-Also: aspect:SEC-01#L5
";

pub fn date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
}

pub fn level(rank: u8) -> Level {
    Level::new(rank).unwrap()
}

/// The model `INDEX_YAML` describes.
pub fn sample_index() -> Index {
    let mut context = BTreeMap::new();
    context.insert(
        "Security".to_string(),
        BTreeMap::from([
            (
                "Encryption".to_string(),
                "Encrypt data at rest and in transit".to_string(),
            ),
            ("Keys".to_string(), "Key management".to_string()),
        ]),
    );
    context.insert(
        "Control".to_string(),
        BTreeMap::from([("msg-CTO".to_string(), "Sign-off by the CTO".to_string())]),
    );
    context.insert(
        "Role".to_string(),
        BTreeMap::from([("Ops".to_string(), "Operations team".to_string())]),
    );

    Index {
        id: "RB".into(),
        name: "Security Rulebook".into(),
        version: "1.2".into(),
        description: "Rules for *keeping* secrets.\n".into(),
        author: Author {
            name: "Jane Doe".into(),
            email: Some("jane@example.com".into()),
            web: None,
        },
        editing: Editing {
            created: date("2024-01-15"),
            modified: date("2024-03-01"),
        },
        validity: Validity {
            from: date("2024-02-01"),
            until: Until::Open,
        },
        logo: None,
        context,
    }
}

/// An assessment level with only the required fields set.
pub fn bare_level(id: &str, what: &str) -> AssessmentLevel {
    AssessmentLevel {
        id: id.into(),
        what: what.into(),
        why: None,
        sota: None,
        optimize: None,
        assess: None,
    }
}

/// An aspect with no assessment and no relations.
pub fn bare_aspect(id: &str) -> Aspect {
    Aspect {
        id: id.into(),
        name: format!("{id} name"),
        objective: format!("{id} objective"),
        icons: None,
        editing: None,
        validity: None,
        assessment: BTreeMap::new(),
        relations: None,
    }
}

/// The model `ASPECT_YAML` describes.
pub fn sample_aspect() -> Aspect {
    let mut assessment = BTreeMap::new();
    assessment.insert(
        level(5),
        AssessmentLevel {
            why: Some("Limits exposure".into()),
            optimize: Some("Speed".into()),
            assess: Some(vec![
                AssessStatement::new(Obligation::Must, "ctx:Control.msg-CTO"),
                AssessStatement::new(Obligation::Should, "ctx:Security.Keys"),
            ]),
            ..bare_level("L5", "Rotate keys every 90 days")
        },
    );
    assessment.insert(
        level(2),
        AssessmentLevel {
            sota: Some("HashiCorp Vault".into()),
            optimize: Some("Cost".into()),
            assess: Some(vec![AssessStatement::new(
                Obligation::May,
                "ctx:Security.Encryption",
            )]),
            ..bare_level("L2", "Store keys in a vault")
        },
    );

    Aspect {
        id: "SEC-01".into(),
        name: "Secrets".into(),
        objective: "Keep **secrets** out of source control.".into(),
        icons: Some(vec!["lock".into()]),
        editing: None,
        validity: None,
        assessment,
        relations: Some(vec![
            Relation::Scope("aspect:NET-01".into()),
            Relation::Demand("ctx:Role.Ops".into()),
            Relation::SeeAlso("https://example.com/secrets".into()),
        ]),
    }
}

/// The model `NETWORK_YAML` describes.
pub fn network_aspect() -> Aspect {
    let mut aspect = bare_aspect("NET-01");
    aspect.name = "Network".into();
    aspect.objective = "Segment the network.".into();
    aspect
        .assessment
        .insert(level(3), bare_level("L3", "Use firewalls"));
    aspect.relations = Some(vec![Relation::SeeAlso("aspect:SEC-01#L5".into())]);
    aspect
}

/// Keeps every message for inspection.
#[derive(Default)]
pub struct RecordingSink {
    progress: RefCell<Vec<String>>,
    warnings: RefCell<Vec<String>>,
}

impl RecordingSink {
    pub fn progress_messages(&self) -> Vec<String> {
        self.progress.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn progress(&self, message: &str) {
        self.progress.borrow_mut().push(message.to_string());
    }

    fn warning(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

/// Create a temporary rulebook directory.
pub fn create_test_rulebook_dir() -> TempDir {
    TempDir::new().unwrap()
}

/// Create a file in the test rulebook directory.
pub fn create_test_file(dir: &TempDir, name: &str, content: &str) {
    std::fs::write(dir.path().join(name), content).unwrap();
}
