//! Core type definitions
//!
//! The registry document mirrors the `claims/registry.yaml` file kept in the
//! source repository. Field names are camelCase on the wire.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_yaml_ng::Value;

use crate::query::{self, ClaimFilter};

/// API version written by the registry tooling
pub const DEFAULT_API_VERSION: &str = "claim-registry.io/v1alpha1";

/// Kind tag of a registry document
pub const DEFAULT_KIND: &str = "ClaimRegistry";

/// Kind tag of a filtered claim listing
pub const CLAIM_LIST_KIND: &str = "ClaimList";

/// Root registry document
///
/// Entry order is preserved from the source file. Names are expected to be
/// unique but this is not enforced; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClaimRegistry {
    /// Schema version tag
    #[serde(deserialize_with = "scalar_string")]
    pub api_version: String,

    /// Kind tag
    #[serde(deserialize_with = "scalar_string")]
    pub kind: String,

    /// Claim entries in source order
    #[serde(deserialize_with = "null_as_default")]
    pub claims: Vec<ClaimEntry>,
}

impl ClaimRegistry {
    /// Create an empty document with the default tags
    pub fn new() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            kind: DEFAULT_KIND.to_string(),
            claims: Vec::new(),
        }
    }

    /// Append an entry
    pub fn with_claim(mut self, entry: ClaimEntry) -> Self {
        self.claims.push(entry);
        self
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the document holds no entries
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// First entry whose name equals `name`
    pub fn find(&self, name: &str) -> Option<&ClaimEntry> {
        query::find_entry(Some(self), name)
    }

    /// Entries matching every set criterion of `filter`, in document order
    pub fn filter(&self, filter: &ClaimFilter) -> Vec<ClaimEntry> {
        query::filter_entries(Some(self), filter)
    }
}

/// A single provisioned resource claim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClaimEntry {
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,

    #[serde(deserialize_with = "scalar_string")]
    pub template: String,

    #[serde(deserialize_with = "scalar_string")]
    pub category: String,

    #[serde(deserialize_with = "scalar_string")]
    pub namespace: String,

    /// Creation timestamp, kept verbatim (not validated)
    #[serde(deserialize_with = "scalar_string")]
    pub created_at: String,

    #[serde(deserialize_with = "scalar_string")]
    pub created_by: String,

    #[serde(deserialize_with = "scalar_string")]
    pub source: String,

    #[serde(deserialize_with = "scalar_string")]
    pub repository: String,

    #[serde(deserialize_with = "scalar_string")]
    pub path: String,

    #[serde(deserialize_with = "scalar_string")]
    pub status: String,
}

impl ClaimEntry {
    /// Create an entry with only a name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Decode any YAML scalar as its string form; null becomes empty.
///
/// Timestamps, numbers and booleans are kept as written instead of
/// failing the whole document.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Tagged(tagged)) => match (*tagged).value {
            Value::String(s) => Ok(s),
            other => Err(de::Error::custom(format!(
                "expected a scalar value, found {:?}",
                other
            ))),
        },
        Some(other) => Err(de::Error::custom(format!(
            "expected a scalar value, found {:?}",
            other
        ))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
