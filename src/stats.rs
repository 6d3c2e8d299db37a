use serde::{Deserialize, Serialize};
use std::fmt;

/// The kinds of GraphQL requests issued during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    UserId,
    RepositoryListing,
    CommitHistory,
    Contributions,
    Stars,
}

impl QueryKind {
    pub const ALL: [QueryKind; 5] = [
        QueryKind::UserId,
        QueryKind::RepositoryListing,
        QueryKind::CommitHistory,
        QueryKind::Contributions,
        QueryKind::Stars,
    ];

    pub fn name(self) -> &'static str {
        match self {
            QueryKind::UserId => "user_id",
            QueryKind::RepositoryListing => "repository_listing",
            QueryKind::CommitHistory => "commit_history",
            QueryKind::Contributions => "contributions",
            QueryKind::Stars => "stars",
        }
    }

    fn slot(self) -> usize {
        match self {
            QueryKind::UserId => 0,
            QueryKind::RepositoryListing => 1,
            QueryKind::CommitHistory => 2,
            QueryKind::Contributions => 3,
            QueryKind::Stars => 4,
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-run request counters, owned by whoever issues the requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStats {
    counts: [u64; QueryKind::ALL.len()],
}

impl QueryStats {
    pub fn record(&mut self, kind: QueryKind) {
        self.counts[kind.slot()] += 1;
    }

    pub fn get(&self, kind: QueryKind) -> u64 {
        self.counts[kind.slot()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QueryKind, u64)> + '_ {
        QueryKind::ALL.iter().map(move |&k| (k, self.get(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_per_kind() {
        let mut stats = QueryStats::default();
        stats.record(QueryKind::CommitHistory);
        stats.record(QueryKind::CommitHistory);
        stats.record(QueryKind::Stars);
        assert_eq!(stats.get(QueryKind::CommitHistory), 2);
        assert_eq!(stats.get(QueryKind::UserId), 0);
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.iter().count(), QueryKind::ALL.len());
    }
}
