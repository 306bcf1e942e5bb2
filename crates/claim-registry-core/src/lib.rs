//! Core domain models for the Claim Registry
//!
//! This crate contains the registry document model, the YAML document
//! parser and the query engine used to look up and filter claim entries.
//! Everything here is pure and synchronous; fetching and publishing
//! snapshots lives in `claim-registry-sync`.

pub mod document;
pub mod error;
pub mod query;
pub mod types;

// Re-exports for convenience
pub use document::{parse, to_yaml};
pub use error::{RegistryError, Result};
pub use query::{filter_entries, find_entry, ClaimFilter};
pub use types::{
    ClaimEntry, ClaimRegistry, CLAIM_LIST_KIND, DEFAULT_API_VERSION, DEFAULT_KIND,
};
