use crate::error::{GhstatError, Result};
use crate::identity::RepoKey;
use crate::model::{CacheRecord, RepositorySnapshot};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Number of leading lines reserved for free-form annotations.
pub const HEADER_LINES: usize = 6;

const DEFAULT_HEADER: [&str; HEADER_LINES] = [
    "# ghstat lines-of-code cache",
    "# record format: <sha256(owner/name)> <commit count> <additions> <deletions>",
    "# all records are reset when the number of repositories changes",
    "# the first six lines are kept verbatim and may be edited freely",
    "#",
    "#",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    pub header: Vec<String>,
    pub records: Vec<CacheRecord>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self {
            header: default_header(),
            records: Vec::new(),
        }
    }
}

fn default_header() -> Vec<String> {
    DEFAULT_HEADER.iter().map(|l| l.to_string()).collect()
}

impl CacheStore {
    /// Parse the line format. A file too short to hold a header gets the
    /// default header; any malformed or duplicated record drops all records.
    /// Lines are split on `\n` only so header bytes survive a rewrite.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.strip_suffix('\n').unwrap_or(text).split('\n').collect();
        if lines.len() < HEADER_LINES {
            return Self::default();
        }

        let header = lines[..HEADER_LINES].iter().map(|l| l.to_string()).collect();
        let records = match parse_records(&lines[HEADER_LINES..]) {
            Ok(records) => records,
            Err(e) => {
                warn!("discarding unreadable cache records: {e}");
                Vec::new()
            }
        };

        Self { header, records }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.header {
            out.push_str(line);
            out.push('\n');
        }
        for record in &self.records {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out
    }

    /// Reset every record to zero, one per snapshot entry, in snapshot order.
    pub fn rebuild(&mut self, snapshot: &[RepositorySnapshot]) {
        self.records = snapshot
            .iter()
            .map(|repo| CacheRecord::empty(repo.key()))
            .collect();
    }

    /// Reorder records to follow `snapshot`. Returns `false`, leaving the
    /// store untouched, when the two do not describe the same repositories.
    pub fn align(&mut self, snapshot: &[RepositorySnapshot]) -> bool {
        if self.records.len() != snapshot.len() {
            return false;
        }
        let by_key: HashMap<RepoKey, CacheRecord> =
            self.records.iter().map(|r| (r.key, *r)).collect();
        let mut aligned = Vec::with_capacity(snapshot.len());
        for repo in snapshot {
            match by_key.get(&repo.key()) {
                Some(record) => aligned.push(*record),
                None => return false,
            }
        }
        self.records = aligned;
        true
    }

    /// Index of each record by key.
    pub fn index(&self) -> HashMap<RepoKey, usize> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.key, i))
            .collect()
    }

    pub fn total_additions(&self) -> u64 {
        self.records.iter().map(|r| r.additions).sum()
    }

    pub fn total_deletions(&self) -> u64 {
        self.records.iter().map(|r| r.deletions).sum()
    }
}

fn parse_records(lines: &[&str]) -> Result<Vec<CacheRecord>> {
    let mut records = Vec::with_capacity(lines.len());
    let mut seen: HashSet<RepoKey> = HashSet::new();

    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_record(line)
            .map_err(|e| GhstatError::Cache(format!("line {}: {e}", HEADER_LINES + i + 1)))?;
        if !seen.insert(record.key) {
            return Err(GhstatError::Cache(format!(
                "line {}: duplicate repository key {}",
                HEADER_LINES + i + 1,
                record.key
            )));
        }
        records.push(record);
    }

    Ok(records)
}

fn parse_record(line: &str) -> Result<CacheRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(GhstatError::Parse(format!(
            "expected 4 fields, found {}",
            fields.len()
        )));
    }
    let number = |s: &str| {
        s.parse::<u64>()
            .map_err(|e| GhstatError::Parse(format!("invalid count '{s}': {e}")))
    };
    Ok(CacheRecord {
        key: fields[0].parse()?,
        last_commit_count: number(fields[1])?,
        additions: number(fields[2])?,
        deletions: number(fields[3])?,
    })
}

/// The cache file on disk.
pub struct Cache {
    path: PathBuf,
}

impl Cache {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store. Missing or unreadable files yield an empty store.
    pub fn load(&self) -> CacheStore {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => CacheStore::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no cache file yet");
                CacheStore::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), "failed to read cache, starting empty: {e}");
                CacheStore::default()
            }
        }
    }

    /// Whole-file overwrite.
    pub fn persist(&self, store: &CacheStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, store.render())?;
        debug!(path = %self.path.display(), records = store.records.len(), "cache persisted");
        Ok(())
    }

    /// Load the store and make it valid for `snapshot`, rebuilding all records
    /// when the repository count changed or the keys no longer line up.
    /// The result is persisted before returning. The flag reports a rebuild.
    pub fn load_or_rebuild(&self, snapshot: &[RepositorySnapshot]) -> Result<(CacheStore, bool)> {
        let mut store = self.load();
        let rebuilt = if store.records.len() != snapshot.len() {
            info!(
                cached = store.records.len(),
                current = snapshot.len(),
                "repository count changed, rebuilding cache"
            );
            store.rebuild(snapshot);
            true
        } else if !store.align(snapshot) {
            warn!("cached repository keys do not match the current repositories, rebuilding cache");
            store.rebuild(snapshot);
            true
        } else {
            false
        };
        self.persist(&store)?;
        Ok((store, rebuilt))
    }

    /// Drop every record, keeping the header.
    pub fn flush(&self) -> Result<CacheStore> {
        let mut store = self.load();
        store.records.clear();
        self.persist(&store)?;
        Ok(store)
    }
}
