use crate::cache::{Cache, CacheStore};
use crate::cli::CommonArgs;
use crate::config::Config;
use crate::loc::{check_record, connect, RecordState};
use crate::model::{CacheEntryOutput, CacheOutput, LocTotals, SCHEMA_VERSION};
use crate::util::{thousands, thousands_signed};
use anyhow::Context;
use console::style;

fn open(common: &CommonArgs) -> anyhow::Result<Cache> {
    let config = Config::for_args(common).context("Failed to load configuration")?;
    Ok(Cache::new(config.cache_path()?))
}

pub fn show(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let cache = open(&common)?;
    let store = cache.load();
    let output = cache_output(&cache, &store);

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        output_table(&output);
    }
    Ok(())
}

pub fn flush(common: CommonArgs) -> anyhow::Result<()> {
    let cache = open(&common)?;
    let before = cache.load().records.len();
    cache.flush().context("Failed to flush cache")?;
    println!(
        "Dropped {} record{} from {}",
        style(before).cyan(),
        crate::util::plural(before as i64),
        cache.path().display()
    );
    Ok(())
}

pub fn check(common: CommonArgs, repo: &str) -> anyhow::Result<()> {
    let config = Config::for_args(&common).context("Failed to load configuration")?;
    let mut client = connect(&config)?;
    let store = Cache::new(config.cache_path()?).load();

    let state = check_record(&store, &mut client, repo)
        .with_context(|| format!("Failed to check {repo}"))?;
    match state {
        RecordState::Hit { commits } => println!(
            "{repo}: {} at {commits} commits",
            style("up to date").green()
        ),
        RecordState::Stale { cached, current } => println!(
            "{repo}: {} (cached {cached} commits, now {current}); the next sync re-walks it",
            style("stale").yellow()
        ),
        RecordState::Untracked { current } => println!(
            "{repo}: {} ({current} commits)",
            style("not in cache").red()
        ),
    }
    Ok(())
}

fn cache_output(cache: &Cache, store: &CacheStore) -> CacheOutput {
    let totals = LocTotals::new(store.total_additions(), store.total_deletions());
    CacheOutput {
        version: SCHEMA_VERSION,
        path: cache.path().to_string_lossy().to_string(),
        header: store.header.clone(),
        entries: store
            .records
            .iter()
            .map(|r| CacheEntryOutput {
                key: r.key.to_string(),
                last_commit_count: r.last_commit_count,
                additions: r.additions,
                deletions: r.deletions,
            })
            .collect(),
        additions: totals.additions,
        deletions: totals.deletions,
        net: totals.net(),
    }
}

fn output_table(output: &CacheOutput) {
    println!(
        "{:<16} {:>8} {:>12} {:>12}",
        style("Key").bold(),
        style("Commits").bold(),
        style("Added").bold(),
        style("Deleted").bold()
    );
    println!("{}", "─".repeat(51));
    for e in &output.entries {
        println!(
            "{:<16} {:>8} {:>12} {:>12}",
            &e.key[..16],
            e.last_commit_count,
            thousands(e.additions),
            thousands(e.deletions)
        );
    }
    println!("{}", "─".repeat(51));
    println!(
        "{} repositories, {}++ {}-- net {}",
        output.entries.len(),
        thousands(output.additions),
        thousands(output.deletions),
        thousands_signed(output.net)
    );
}
