use std::collections::BTreeMap;

use serde::Serialize;

use super::common::{Author, Editing, Logo, Validity};
use crate::reference::ContextRef;

/// Namespace -> name -> free text.
pub type ContextMap = BTreeMap<String, BTreeMap<String, String>>;

/// Rulebook-wide metadata and the namespace of valid context references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Index {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: Author,
    pub editing: Editing,
    pub validity: Validity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<Logo>,
    pub context: ContextMap,
}

impl Index {
    /// Look up the context entry a reference points at.
    ///
    /// The namespace itself may contain dots, so every split of the path is
    /// tried, shortest namespace first.
    pub fn resolve_context(&self, reference: &ContextRef<'_>) -> Option<&str> {
        reference.splits().find_map(|(namespace, name)| {
            self.context
                .get(namespace)
                .and_then(|names| names.get(name))
                .map(String::as_str)
        })
    }
}
