//! Repository identity keys.
//!
//! A repository is identified in the cache by the SHA-256 digest of its
//! `owner/name` string, stored as 64 lowercase hex characters. The key is an
//! equality token only and is never reversed.

use crate::error::{GhstatError, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

pub const KEY_HEX_LEN: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepoKey([u8; 32]);

impl RepoKey {
    pub fn of(full_name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(full_name.as_bytes());
        Self(hasher.finalize().into())
    }
}

/// Hash a repository's full name into its cache key.
pub fn hash_identity(full_name: &str) -> RepoKey {
    RepoKey::of(full_name)
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for RepoKey {
    type Err = GhstatError;

    fn from_str(s: &str) -> Result<Self> {
        if s.len() != KEY_HEX_LEN {
            return Err(GhstatError::Parse(format!(
                "repository key must be {KEY_HEX_LEN} hex characters, got {}",
                s.len()
            )));
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| GhstatError::Parse(format!("invalid repository key '{s}': {e}")))?;
        Ok(Self(bytes))
    }
}
