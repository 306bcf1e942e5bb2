//! Query engine
//!
//! Exact-match lookup and filtering over an immutable registry document.
//! Both operations accept an absent document so callers holding an
//! optional snapshot can query it directly; telling "not loaded" apart
//! from "no matches" is the caller's job.

use serde::{Deserialize, Serialize};

use crate::types::{ClaimEntry, ClaimRegistry};

/// Filter criteria for listing claims
///
/// Every criterion is an exact, case-sensitive match on the field of the
/// same name. Unset and empty criteria match everything; set criteria are
/// combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ClaimFilter {
    /// Filter that matches every entry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether no criterion is effectively set
    pub fn is_empty(&self) -> bool {
        [&self.category, &self.template, &self.status, &self.source]
            .into_iter()
            .all(|c| criterion(c).is_none())
    }

    /// Whether `entry` satisfies every set criterion
    pub fn matches(&self, entry: &ClaimEntry) -> bool {
        field_matches(&self.category, &entry.category)
            && field_matches(&self.template, &entry.template)
            && field_matches(&self.status, &entry.status)
            && field_matches(&self.source, &entry.source)
    }
}

fn criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn field_matches(wanted: &Option<String>, actual: &str) -> bool {
    criterion(wanted).map_or(true, |w| w == actual)
}

/// Return the first entry whose name equals `name` exactly.
///
/// Duplicate names are allowed in a document; the earliest one wins.
pub fn find_entry<'a>(registry: Option<&'a ClaimRegistry>, name: &str) -> Option<&'a ClaimEntry> {
    registry?.claims.iter().find(|entry| entry.name == name)
}

/// Return the entries matching `filter`, in document order.
///
/// Never fails; no match (or no document) is an empty vector.
pub fn filter_entries(registry: Option<&ClaimRegistry>, filter: &ClaimFilter) -> Vec<ClaimEntry> {
    let Some(registry) = registry else {
        return Vec::new();
    };

    registry
        .claims
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect()
}
