use crate::identity::RepoKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// One repository as currently reported by the listing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    pub full_name: String,
    pub total_commit_count: u64,
}

impl RepositorySnapshot {
    pub fn new(full_name: impl Into<String>, total_commit_count: u64) -> Self {
        Self {
            full_name: full_name.into(),
            total_commit_count,
        }
    }

    pub fn key(&self) -> RepoKey {
        RepoKey::of(&self.full_name)
    }

    /// Split `owner/name`. Names without a slash are treated as owner-less.
    pub fn owner_and_name(&self) -> (&str, &str) {
        match self.full_name.split_once('/') {
            Some((owner, name)) => (owner, name),
            None => ("", self.full_name.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheRecord {
    pub key: RepoKey,
    pub last_commit_count: u64,
    pub additions: u64,
    pub deletions: u64,
}

impl CacheRecord {
    pub fn empty(key: RepoKey) -> Self {
        Self {
            key,
            last_commit_count: 0,
            additions: 0,
            deletions: 0,
        }
    }
}

impl fmt::Display for CacheRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.key, self.last_commit_count, self.additions, self.deletions
        )
    }
}

/// A single commit from a history walk. `author` is `None` when the commit
/// is not linked to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub author: Option<String>,
    pub additions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitPage {
    pub records: Vec<CommitRecord>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocTotals {
    pub additions: u64,
    pub deletions: u64,
}

impl LocTotals {
    pub fn new(additions: u64, deletions: u64) -> Self {
        Self { additions, deletions }
    }

    pub fn add(&mut self, additions: u64, deletions: u64) {
        self.additions += additions;
        self.deletions += deletions;
    }

    /// Net lines; negative when more was deleted than added.
    pub fn net(&self) -> i64 {
        self.additions as i64 - self.deletions as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Affiliation {
    Owner,
    Collaborator,
    OrganizationMember,
}

impl Affiliation {
    pub fn all() -> Vec<Affiliation> {
        vec![
            Affiliation::Owner,
            Affiliation::Collaborator,
            Affiliation::OrganizationMember,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub login: String,
    pub repositories: usize,
    pub refreshed: usize,
    pub cache_hits: usize,
    pub rebuilt: bool,
    pub additions: u64,
    pub deletions: u64,
    pub net: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntryOutput {
    pub key: String,
    pub last_commit_count: u64,
    pub additions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheOutput {
    pub version: u32,
    pub path: String,
    pub header: Vec<String>,
    pub entries: Vec<CacheEntryOutput>,
    pub additions: u64,
    pub deletions: u64,
    pub net: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTiming {
    pub step: String,
    pub seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub login: String,
    pub age: String,
    pub commits: u64,
    pub stars: u64,
    pub repositories: u64,
    pub contributed: u64,
    pub loc: LocOutput,
    pub timings: Vec<StepTiming>,
    pub queries: Vec<(String, u64)>,
}
