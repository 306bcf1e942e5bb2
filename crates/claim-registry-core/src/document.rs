//! Registry document decoding
//!
//! Only structural shape is checked here. Field contents (timestamps,
//! status values) are never validated and unknown keys are ignored so
//! newer registry files keep loading.

use serde::Deserialize;

use crate::error::{RegistryError, Result};
use crate::types::ClaimRegistry;

/// Decode a raw YAML payload into a registry document.
///
/// An empty payload (or a document that is just `null`) yields an empty
/// document. Only the first document of a multi-document stream is read.
/// Malformed YAML, or YAML whose shape cannot be a registry (for example a
/// top-level scalar), is a [`RegistryError::Parse`].
pub fn parse(data: &[u8]) -> Result<ClaimRegistry> {
    let Some(document) = serde_yaml_ng::Deserializer::from_slice(data).next() else {
        return Ok(ClaimRegistry::default());
    };
    let registry = Option::<ClaimRegistry>::deserialize(document)?;
    Ok(registry.unwrap_or_default())
}

/// Serialize a registry document back to YAML
pub fn to_yaml(registry: &ClaimRegistry) -> Result<String> {
    serde_yaml_ng::to_string(registry).map_err(|e| RegistryError::Serialization(e.to_string()))
}
