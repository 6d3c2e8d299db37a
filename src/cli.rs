use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ghstat")]
#[command(about = "GitHub profile statistics with an incremental lines-of-code cache")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to lines-of-code cache file")]
    pub cache: Option<PathBuf>,

    #[arg(long, global = true, help = "GitHub login to collect statistics for")]
    pub login: Option<String>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv)")]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect every statistic and rewrite the badge templates
    Run {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Do not rewrite templates")]
        dry_run: bool,
    },
    /// Synchronise the lines-of-code cache and print the totals
    Loc {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Inspect or reset the lines-of-code cache
    Cache {
        #[command(subcommand)]
        action: CacheCommands,
    },
    /// Print the age text for a birthday
    Age {
        #[arg(long, help = "Birthday (YYYY-MM-DD); defaults to the configured one")]
        birthday: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Print the cached records and totals
    Show {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
    /// Drop every record; the next sync re-walks all repositories
    Flush,
    /// Compare one repository's record with its live commit count
    Check {
        #[arg(help = "Repository as owner/name")]
        repo: String,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run { json, dry_run } => crate::run::exec(self.common, json, dry_run),
            Commands::Loc { json } => crate::loc::exec(self.common, json),
            Commands::Cache { action } => match action {
                CacheCommands::Show { json } => crate::inspect::show(self.common, json),
                CacheCommands::Flush => crate::inspect::flush(self.common),
                CacheCommands::Check { repo } => crate::inspect::check(self.common, &repo),
            },
            Commands::Age { birthday } => crate::age::exec(self.common, birthday),
        }
    }
}
