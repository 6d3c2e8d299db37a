use crate::model::LocOutput;
use crate::stats::QueryStats;
use crate::util::{thousands, thousands_signed};
use anyhow::Result;
use console::style;

pub fn output_json(output: &LocOutput) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(output)?);
    Ok(())
}

pub fn output_summary(output: &LocOutput, queries: &QueryStats) -> Result<()> {
    println!("{}", style("Lines of Code").bold());
    println!("{}", "─".repeat(40));
    println!("Repositories:  {}", style(output.repositories).cyan());
    println!(
        "Re-walked:     {} {}",
        style(output.refreshed).yellow(),
        if output.rebuilt {
            style("(cache rebuilt)").dim().to_string()
        } else {
            String::new()
        }
    );
    println!("Cache hits:    {}", style(output.cache_hits).cyan());
    println!("Added:         {}", style(format!("{}++", thousands(output.additions))).green());
    println!("Deleted:       {}", style(format!("{}--", thousands(output.deletions))).red());
    println!("Net:           {}", style(thousands_signed(output.net)).bold());
    println!(
        "\n{} GraphQL calls",
        style(queries.total()).dim()
    );
    Ok(())
}
