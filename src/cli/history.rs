//! History subcommand implementation.

use super::Context;
use crate::error::CliResult;
use crate::output;
use crate::storage::ScanStore;
use clap::Parser;
use console::style;

/// View and manage scan history.
#[derive(Parser, Debug)]
pub struct HistoryCommand {
    /// Number of recent scans to show
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Show detailed information for each scan
    #[arg(short, long)]
    pub detailed: bool,

    /// Clear all scan history
    #[arg(long)]
    pub clear: bool,

    /// Delete scans older than N days
    #[arg(long, value_name = "DAYS")]
    pub prune: Option<u32>,
}

impl HistoryCommand {
    /// Execute the history command.
    pub fn execute(&self, ctx: &Context) -> CliResult<()> {
        let store = ScanStore::new()?;

        if self.clear {
            let mut removed = 0;
            for id in store.list_ids()? {
                store.delete(&id)?;
                removed += 1;
            }
            output::print_success(&format!("Removed {} scans", removed));
            return Ok(());
        }

        if let Some(days) = self.prune {
            let removed = store.cleanup(chrono::Duration::days(i64::from(days)))?;
            output::print_success(&format!("Pruned {} scans older than {} days", removed, days));
            return Ok(());
        }

        let records = store.list_recent(self.count)?;
        if records.is_empty() {
            if !ctx.quiet {
                output::print_info("No scans in history.");
            }
            return Ok(());
        }

        for record in &records {
            println!(
                "{}  {}  {}",
                style(record.id.short()).dim(),
                record.started_at.format("%Y-%m-%d %H:%M"),
                record.summary()
            );
            if self.detailed {
                println!(
                    "          {} found, {} not found, {} errored, {} abandoned",
                    record.stats.found, record.stats.not_found, record.stats.errored, record.stats.abandoned
                );
                for hit in &record.results {
                    let status = hit.status_code.map_or_else(String::new, |s| format!("[{}] ", s));
                    println!("          {}{}", status, hit.resolved_url);
                }
            }
        }

        Ok(())
    }
}
