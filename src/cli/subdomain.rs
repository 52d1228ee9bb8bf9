//! Subdomain subcommand implementation.

use super::{finish_scan, Context, ScanArgs};
use crate::config::AppSettings;
use crate::discovery::{ScanKind, SubdomainScan};
use crate::engine::CancelSignal;
use crate::error::CliResult;
use crate::output;
use crate::storage::ScanRecord;
use chrono::Utc;
use clap::Parser;

/// Discover subdomains of a domain by DNS, then check them over HTTP(S).
#[derive(Parser, Debug)]
pub struct SubdomainCommand {
    /// Domain to enumerate (e.g. example.com)
    #[arg(value_name = "DOMAIN")]
    pub domain: String,

    /// Skip the HTTP(S) verification pass
    #[arg(long)]
    pub no_verify: bool,

    /// Maximum verification requests in flight
    #[arg(long, value_name = "N")]
    pub verify_concurrency: Option<usize>,

    /// DNS timeout in milliseconds
    #[arg(long, value_name = "MS")]
    pub dns_timeout: Option<u64>,

    #[command(flatten)]
    pub scan: ScanArgs,
}

impl SubdomainCommand {
    /// Overlay this command's flags on the loaded settings.
    ///
    /// DNS lookups are bounded by `--dns-timeout`; `--timeout` applies to the
    /// HTTP verification requests.
    pub fn apply(&self, settings: &mut AppSettings) {
        self.scan.apply(settings);
        if let Some(secs) = self.scan.timeout {
            settings.verify_timeout_secs = secs;
        }
        if let Some(n) = self.verify_concurrency {
            settings.verify_concurrency = n;
        }
        if let Some(ms) = self.dns_timeout {
            settings.dns_timeout_ms = ms;
        }
    }

    /// Execute the subdomain command.
    pub async fn execute(&self, ctx: &Context) -> CliResult<()> {
        let mut settings = ctx.settings.clone();
        self.apply(&mut settings);

        let mut scan = SubdomainScan::from_settings(&self.domain, &settings)
            .with_wordlist(self.scan.wordlist.clone())
            .with_bundled_dir(ctx.wordlists_dir())
            .with_verify(!self.no_verify);
        scan.options = self.scan.limits(scan.options);

        if !ctx.quiet {
            output::print_scan_header(ScanKind::Subdomain, &self.domain, settings.concurrency);
        }

        let cancel = CancelSignal::new();
        cancel.cancel_on_ctrl_c();
        let started_at = Utc::now();
        let reporters = ctx.reporters();
        let report = scan.run(&cancel, &reporters).await?;

        let record = ScanRecord::subdomain(report, started_at);
        finish_scan(&record, &self.scan, ctx, &settings)
    }
}
