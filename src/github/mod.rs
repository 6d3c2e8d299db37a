pub mod client;
pub mod queries;

pub use client::GitHubClient;

use crate::error::Result;
use crate::model::CommitPage;

/// Commit history as the LOC cache sees it.
pub trait CommitSource {
    /// Total commits on the default branch; zero when there is none.
    fn fetch_commit_count(&mut self, owner: &str, repo: &str) -> Result<u64>;

    /// One page of history starting after `cursor`. `Ok(None)` means the
    /// repository has no default branch.
    fn fetch_commit_page(
        &mut self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<Option<CommitPage>>;
}
