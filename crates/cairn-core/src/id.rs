//! Node ID generation
//!
//! - Format: `cn-<suffix>`
//! - `hash` scheme: SHA-256 of content + timestamp + nonce, shortest prefix
//!   (min 6 hex chars) that does not collide with existing ids
//! - `ulid` scheme: lowercase ULID, sortable by creation time

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{CairnError, Result};

/// ID generation scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// Hash-based IDs (default): `cn-<hex>`
    #[default]
    Hash,
    /// ULID-based IDs: `cn-<ulid>`
    Ulid,
}

impl FromStr for IdScheme {
    type Err = CairnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hash" => Ok(IdScheme::Hash),
            "ulid" => Ok(IdScheme::Ulid),
            other => Err(CairnError::invalid_value("id scheme", other)),
        }
    }
}

/// Opaque node identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// The standard ID prefix
    pub const PREFIX: &'static str = "cn-";

    /// Minimum hash length (6 hex chars)
    pub const MIN_HASH_LEN: usize = 6;

    /// Maximum hash length (64 hex chars for SHA256)
    pub const MAX_HASH_LEN: usize = 64;

    /// Wrap an existing id string. Ids are opaque, so anything non-empty is accepted.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CairnError::invalid_value("node id", "<empty>"));
        }
        Ok(NodeId(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generate a new hash-based ID that does not collide with `existing`
    pub fn generate_hash<V>(content: &str, existing: &BTreeMap<NodeId, V>) -> Self {
        let timestamp = Utc::now().timestamp_nanos_opt().unwrap_or(0);
        let input = format!("{}:{}:{}", content, timestamp, next_nonce());

        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        let full_hex = hex::encode(hasher.finalize());

        let mut len = Self::MIN_HASH_LEN;
        loop {
            let candidate = NodeId(format!("{}{}", Self::PREFIX, &full_hex[..len]));
            if !existing.contains_key(&candidate) || len >= Self::MAX_HASH_LEN {
                return candidate;
            }
            len += 1;
        }
    }

    /// Generate a new ULID-based ID
    pub fn generate_ulid() -> Self {
        NodeId(format!(
            "{}{}",
            Self::PREFIX,
            ulid::Ulid::new().to_string().to_lowercase()
        ))
    }

    /// Generate a new ID using the specified scheme
    pub fn generate<V>(scheme: IdScheme, content: &str, existing: &BTreeMap<NodeId, V>) -> Self {
        match scheme {
            IdScheme::Hash => Self::generate_hash(content, existing),
            IdScheme::Ulid => Self::generate_ulid(),
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NodeId {
    type Err = CairnError;

    fn from_str(s: &str) -> Result<Self> {
        NodeId::new(s)
    }
}

/// Process-local counter so two ids minted in the same nanosecond still differ
fn next_nonce() -> u64 {
    static NONCE: AtomicU64 = AtomicU64::new(0);
    NONCE.fetch_add(1, Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_rejects_empty() {
        assert!(NodeId::new("cn-a1b2c3").is_ok());
        assert!(NodeId::new("anything-opaque").is_ok());
        assert!(NodeId::new("").is_err());
        assert!(NodeId::new("   ").is_err());
    }

    #[test]
    fn test_generate_hash_id() {
        let existing: BTreeMap<NodeId, ()> = BTreeMap::new();
        let id = NodeId::generate_hash("some content", &existing);
        assert!(id.as_str().starts_with("cn-"));
        assert_eq!(id.as_str().len(), NodeId::PREFIX.len() + NodeId::MIN_HASH_LEN);
    }

    #[test]
    fn test_generate_hash_ids_are_distinct() {
        let mut existing: BTreeMap<NodeId, ()> = BTreeMap::new();
        for _ in 0..200 {
            let id = NodeId::generate_hash("same content", &existing);
            assert!(!existing.contains_key(&id));
            existing.insert(id, ());
        }
        assert_eq!(existing.len(), 200);
    }

    #[test]
    fn test_generate_ulid() {
        let id = NodeId::generate_ulid();
        assert!(id.as_str().starts_with("cn-"));
        assert_eq!(id.as_str().len(), 3 + 26);
    }

    #[test]
    fn test_id_scheme_parse() {
        assert_eq!("hash".parse::<IdScheme>().unwrap(), IdScheme::Hash);
        assert_eq!("ULID".parse::<IdScheme>().unwrap(), IdScheme::Ulid);
        assert!("timestamp".parse::<IdScheme>().is_err());
    }
}
