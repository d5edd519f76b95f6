//! Knowledge search value types.

use crate::tenant::domain::OrganizationId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Partition of the knowledge index owned by one organization.
///
/// Only constructible from an organization, so a search can never address
/// another tenant's namespace by accident.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeNamespace(String);

impl KnowledgeNamespace {
    /// Returns the namespace of an organization.
    #[must_use]
    pub fn for_organization(organization_id: &OrganizationId) -> Self {
        Self(organization_id.as_str().to_owned())
    }

    /// Returns the namespace as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KnowledgeNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A ranked passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    /// Source document title, when known.
    pub title: Option<String>,
    /// Passage text.
    pub text: String,
}

/// Ranked passages and their combined text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Passages, best first.
    pub entries: Vec<SearchEntry>,
    /// Passages joined for prompting.
    pub text: String,
}

impl SearchResults {
    /// Builds results from ranked passages, joining their text.
    #[must_use]
    pub fn from_entries(entries: Vec<SearchEntry>) -> Self {
        let text = entries
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        Self { entries, text }
    }

    /// Returns the titles of the passages that have one.
    #[must_use]
    pub fn titles(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| entry.title.as_deref())
            .collect()
    }
}
