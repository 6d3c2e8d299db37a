use super::{output_json, output_summary, sync_with_progress, SyncReport};
use crate::cache::Cache;
use crate::cli::CommonArgs;
use crate::config::Config;
use crate::github::GitHubClient;
use crate::model::{LocOutput, SCHEMA_VERSION};
use anyhow::Context;
use chrono::Utc;

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::for_args(&common).context("Failed to load configuration")?;
    let mut client = connect(&config)?;
    let cache = Cache::new(config.cache_path()?);

    let identity = client.user_id().context("Failed to resolve account id")?;
    let snapshot = client
        .repository_snapshot(&config.affiliations)
        .context("Failed to list repositories")?;

    let report = sync_with_progress(&cache, &mut client, &identity, &snapshot, !json)
        .context("Failed to synchronise lines-of-code cache")?;

    let output = loc_output(client.login(), &report);
    if json {
        output_json(&output)?;
    } else {
        output_summary(&output, client.stats())?;
    }

    Ok(())
}

pub fn connect(config: &Config) -> anyhow::Result<GitHubClient> {
    let login = config.require_login()?;
    let token = config.token()?;
    GitHubClient::new(&config.api_url, &token, login, config.timeout())
        .context("Failed to create HTTP client")
}

pub fn loc_output(login: &str, report: &SyncReport) -> LocOutput {
    LocOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        login: login.to_string(),
        repositories: report.repositories,
        refreshed: report.refreshed,
        cache_hits: report.cache_hits,
        rebuilt: report.rebuilt,
        additions: report.totals.additions,
        deletions: report.totals.deletions,
        net: report.net(),
    }
}
