//! Error types for the Claim Registry core

use thiserror::Error;

/// Result type alias for core registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Main error type for core registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The payload is not well-formed YAML
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization of a document failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RegistryError {
    /// Whether this error came from decoding a document
    pub fn is_parse(&self) -> bool {
        matches!(self, RegistryError::Parse(_))
    }
}

impl From<serde_yaml_ng::Error> for RegistryError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        RegistryError::Parse(err.to_string())
    }
}
