use crate::age::Age;
use crate::cache::Cache;
use crate::cli::CommonArgs;
use crate::config::Config;
use crate::loc::{connect, loc_output, sync_with_progress};
use crate::model::{Affiliation, RunOutput, StepTiming, SCHEMA_VERSION};
use crate::stats::QueryStats;
use crate::svg::{self, BadgeValues};
use crate::util::{format_duration, thousands, thousands_signed, timed};
use anyhow::Context;
use chrono::{Local, Utc};
use console::style;
use std::time::Duration;

struct Timings(Vec<(&'static str, Duration)>);

impl Timings {
    fn push(&mut self, step: &'static str, elapsed: Duration) {
        self.0.push((step, elapsed));
    }

    fn total(&self) -> Duration {
        self.0.iter().map(|(_, d)| *d).sum()
    }
}

pub fn exec(common: CommonArgs, json: bool, dry_run: bool) -> anyhow::Result<()> {
    let config = Config::for_args(&common).context("Failed to load configuration")?;
    let mut client = connect(&config)?;
    let cache = Cache::new(config.cache_path()?);
    let mut timings = Timings(Vec::new());

    let (identity, t) = timed(|| client.user_id());
    timings.push("account id", t);
    let identity = identity.context("Failed to resolve account id")?;

    let (age, t) = timed(|| -> anyhow::Result<String> {
        Ok(match config.birthday()? {
            Some(birthday) => Age::between(birthday, Local::now().date_naive())?.to_string(),
            None => String::new(),
        })
    });
    timings.push("age calculation", t);
    let age = age?;

    let (report, t) = timed(|| -> anyhow::Result<_> {
        let snapshot = client
            .repository_snapshot(&config.affiliations)
            .context("Failed to list repositories")?;
        sync_with_progress(&cache, &mut client, &identity, &snapshot, !json)
            .context("Failed to synchronise lines-of-code cache")
    });
    timings.push("LOC (cached)", t);
    let report = report?;

    let since = config.contributions_since()?;
    let (commits, t) = timed(|| client.total_contributions(Utc::now(), since));
    timings.push("commit counter", t);
    let commits = commits.context("Failed to count contributions")?;

    let (stars, t) = timed(|| client.star_count(&[Affiliation::Owner]));
    timings.push("star counter", t);
    let stars = stars.context("Failed to count stars")?;

    let (repositories, t) = timed(|| client.repository_count(&[Affiliation::Owner]));
    timings.push("my repositories", t);
    let repositories = repositories.context("Failed to count repositories")?;

    let (contributed, t) = timed(|| client.repository_count(&config.affiliations));
    timings.push("contributed repos", t);
    let contributed = contributed.context("Failed to count contributed repositories")?;

    let values = BadgeValues {
        age,
        repos: repositories,
        contributed,
        commits,
        stars,
        loc: report.totals,
    };

    if !dry_run {
        for template in &config.templates {
            svg::overwrite(template, &values, &config.template_ids)
                .with_context(|| format!("Failed to update {}", template.display()))?;
        }
    }

    let queries = client.stats().clone();
    if json {
        let output = RunOutput {
            version: SCHEMA_VERSION,
            generated_at: Utc::now(),
            login: client.login().to_string(),
            age: values.age.clone(),
            commits,
            stars,
            repositories,
            contributed,
            loc: loc_output(client.login(), &report),
            timings: timings
                .0
                .iter()
                .map(|(step, d)| StepTiming {
                    step: step.to_string(),
                    seconds: d.as_secs_f64(),
                })
                .collect(),
            queries: queries.iter().map(|(k, n)| (k.to_string(), n)).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        output_summary(&values, &timings, &queries);
    }

    Ok(())
}

fn output_summary(values: &BadgeValues, timings: &Timings, queries: &QueryStats) {
    println!("{}", style("Calculation times:").bold());
    for (step, elapsed) in &timings.0 {
        println!("   {:<20}{:>14}", format!("{step}:"), format_duration(*elapsed));
    }
    println!(
        "{:<23}{:>14}",
        style("Total function time:").bold(),
        format_duration(timings.total())
    );

    println!();
    if !values.age.is_empty() {
        println!("Uptime:        {}", values.age);
    }
    println!("Repositories:  {} (contributed {})", thousands(values.repos), thousands(values.contributed));
    println!("Commits:       {}", thousands(values.commits));
    println!("Stars:         {}", thousands(values.stars));
    println!(
        "Lines of code: {} ( {} , {} )",
        style(thousands_signed(values.loc.net())).bold(),
        style(format!("{}++", thousands(values.loc.additions))).green(),
        style(format!("{}--", thousands(values.loc.deletions))).red()
    );

    println!();
    println!("Total GitHub GraphQL API calls: {:>3}", queries.total());
    for (kind, count) in queries.iter() {
        println!("   {:<25}{:>6}", format!("{kind}:"), count);
    }
}
