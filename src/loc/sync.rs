use super::aggregate::aggregate;
use crate::cache::{Cache, CacheStore};
use crate::error::{GhstatError, Result};
use crate::github::CommitSource;
use crate::identity::RepoKey;
use crate::model::{LocTotals, RepositorySnapshot};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

/// Outcome of one synchronisation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub totals: LocTotals,
    pub repositories: usize,
    pub refreshed: usize,
    pub cache_hits: usize,
    pub rebuilt: bool,
}

impl SyncReport {
    pub fn net(&self) -> i64 {
        self.totals.net()
    }
}

pub fn sync<S: CommitSource + ?Sized>(
    cache: &Cache,
    source: &mut S,
    identity: &str,
    snapshot: &[RepositorySnapshot],
) -> Result<SyncReport> {
    sync_with_progress(cache, source, identity, snapshot, false)
}

/// Bring the cache in line with `snapshot` and return the LOC totals.
///
/// A repository whose commit count differs from its cached count has its
/// whole history re-walked and its record replaced; matching counts are left
/// alone. Records are written back only once every repository is done, so
/// a failure part-way through leaves the cache as it was after validation.
pub fn sync_with_progress<S: CommitSource + ?Sized>(
    cache: &Cache,
    source: &mut S,
    identity: &str,
    snapshot: &[RepositorySnapshot],
    show_progress: bool,
) -> Result<SyncReport> {
    let (mut store, rebuilt) = cache.load_or_rebuild(snapshot)?;
    let index = store.index();

    let pb = if show_progress {
        let pb = ProgressBar::new(snapshot.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut report = SyncReport {
        repositories: snapshot.len(),
        rebuilt,
        ..SyncReport::default()
    };

    for (i, repo) in snapshot.iter().enumerate() {
        pb.set_message(repo.full_name.clone());
        let slot = *index
            .get(&repo.key())
            .ok_or_else(|| GhstatError::IdentityAlignment {
                index: i,
                repository: repo.full_name.clone(),
            })?;
        let record = &mut store.records[slot];

        if record.last_commit_count == repo.total_commit_count {
            report.cache_hits += 1;
            pb.inc(1);
            continue;
        }

        debug!(
            repository = %repo.full_name,
            cached = record.last_commit_count,
            current = repo.total_commit_count,
            "commit count changed, re-walking history"
        );
        let (owner, name) = repo.owner_and_name();
        let loc = aggregate(source, owner, name, identity)?;

        record.last_commit_count = repo.total_commit_count;
        record.additions = loc.additions;
        record.deletions = loc.deletions;
        report.refreshed += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();

    cache.persist(&store)?;

    report.totals = LocTotals::new(store.total_additions(), store.total_deletions());
    info!(
        repositories = report.repositories,
        refreshed = report.refreshed,
        hits = report.cache_hits,
        rebuilt = report.rebuilt,
        "lines of code synchronised"
    );
    Ok(report)
}

/// What the next sync would do with one repository's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Hit { commits: u64 },
    Stale { cached: u64, current: u64 },
    Untracked { current: u64 },
}

/// Compare the cached record for `full_name` with the live commit count.
/// Only the count is fetched; history is never walked.
pub fn check_record<S: CommitSource + ?Sized>(
    store: &CacheStore,
    source: &mut S,
    full_name: &str,
) -> Result<RecordState> {
    let (owner, name) = full_name
        .split_once('/')
        .ok_or_else(|| GhstatError::Parse(format!("expected owner/name, got '{full_name}'")))?;
    let current = source.fetch_commit_count(owner, name)?;
    let key = RepoKey::of(full_name);

    let state = match store.records.iter().find(|r| r.key == key) {
        Some(record) if record.last_commit_count == current => RecordState::Hit { commits: current },
        Some(record) => RecordState::Stale {
            cached: record.last_commit_count,
            current,
        },
        None => RecordState::Untracked { current },
    };
    debug!(repository = %full_name, ?state, "record checked");
    Ok(state)
}
