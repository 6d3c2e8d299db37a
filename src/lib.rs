pub mod age;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod identity;
pub mod inspect;
pub mod loc;
pub mod model;
pub mod run;
pub mod stats;
pub mod svg;
pub mod util;

pub use cache::{Cache, CacheStore};
pub use error::{GhstatError, Result};
pub use github::{CommitSource, GitHubClient};
pub use identity::{hash_identity, RepoKey};
pub use loc::{aggregate, sync, SyncReport};
pub use model::{CacheRecord, CommitPage, CommitRecord, LocTotals, RepositorySnapshot};
