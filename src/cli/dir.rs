//! Dir subcommand implementation.
//!
//! Handles the `voidex dir <url>` command for path discovery.

use super::{finish_scan, Context, ScanArgs};
use crate::discovery::{DirectoryScan, ScanKind};
use crate::engine::CancelSignal;
use crate::error::CliResult;
use crate::output;
use crate::storage::ScanRecord;
use chrono::Utc;
use clap::Parser;

/// Discover directories and files under a base URL.
#[derive(Parser, Debug)]
pub struct DirCommand {
    /// Base URL to scan (scheme defaults to http://)
    ///
    /// Examples:
    ///   example.com
    ///   https://example.com/app/
    #[arg(value_name = "URL")]
    pub url: String,

    /// Extensions to append to every word (e.g. "php,html,.bak")
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Status codes to report (default: 200,201,204,301,302,307,401,403)
    #[arg(short = 's', long = "status", value_delimiter = ',')]
    pub statuses: Vec<u16>,

    #[command(flatten)]
    pub scan: ScanArgs,
}

impl DirCommand {
    /// Execute the dir command.
    pub async fn execute(&self, ctx: &Context) -> CliResult<()> {
        let mut settings = ctx.settings.clone();
        self.scan.apply(&mut settings);
        if !self.statuses.is_empty() {
            settings.valid_statuses = self.statuses.clone();
        }

        let mut scan = DirectoryScan::from_settings(&self.url, &settings)
            .with_wordlist(self.scan.wordlist.clone())
            .with_bundled_dir(ctx.wordlists_dir())
            .with_extensions(self.extensions.clone());
        scan.options = self.scan.limits(scan.options);

        if !ctx.quiet {
            output::print_scan_header(ScanKind::Directory, &self.url, settings.concurrency);
        }

        let cancel = CancelSignal::new();
        cancel.cancel_on_ctrl_c();
        let started_at = Utc::now();
        let reporters = ctx.reporters();
        let result = scan.run(&cancel, &reporters).await?;

        let record = ScanRecord::directory(result, started_at);
        finish_scan(&record, &self.scan, ctx, &settings)
    }
}
