//! CLI subcommand definitions and handlers.
//!
//! Implements a git-like subcommand architecture:
//! - `voidex dir <url>` - Discover paths under a base URL
//! - `voidex subdomain <domain>` - Discover subdomains of a domain
//! - `voidex history` - View scan history
//! - `voidex export <scan-id>` - Export scan results

mod dir;
mod export;
mod history;
mod subdomain;

pub use dir::DirCommand;
pub use export::ExportCommand;
pub use history::HistoryCommand;
pub use subdomain::SubdomainCommand;

use crate::config::{AppSettings, Paths};
use crate::engine::{BarReporter, EngineOptions, ProgressReporter, SilentReporter};
use crate::error::CliResult;
use crate::output;
use crate::storage::{JsonFileSink, ResultSink, ScanRecord, ScanStore};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// VOIDEX - concurrent directory and subdomain discovery.
///
/// Probes every word of a wordlist against a target with bounded
/// concurrency, a hard per-probe timeout and live progress. Ctrl-C stops
/// the scan and still reports what was found.
#[derive(Parser, Debug)]
#[command(name = "voidex")]
#[command(author = "Sanad.CodeX")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Concurrent directory and subdomain discovery", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a configuration file (YAML or JSON)
    #[arg(long, global = true, value_name = "PATH", env = "VOIDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress banner display
    #[arg(long, global = true)]
    pub no_banner: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover directories and files under a URL
    #[command(alias = "d", alias = "dirbrute")]
    Dir(DirCommand),

    /// Discover subdomains of a domain
    #[command(alias = "sub")]
    Subdomain(SubdomainCommand),

    /// View scan history
    #[command(alias = "h")]
    History(HistoryCommand),

    /// Export scan results
    #[command(alias = "e")]
    Export(ExportCommand),
}

/// Options shared by the scanning subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Wordlist file (falls back to the bundled list)
    #[arg(short, long, value_name = "FILE")]
    pub wordlist: Option<PathBuf>,

    /// Maximum number of probes in flight
    #[arg(short = 'c', long)]
    pub concurrency: Option<usize>,

    /// Per-request HTTP timeout in seconds (verification requests for subdomain scans)
    #[arg(short = 't', long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Rate limit in requests per second (0 = unlimited)
    #[arg(short = 'r', long = "rate")]
    pub rate_limit: Option<u32>,

    /// Stop admitting new probes after this many seconds
    #[arg(long = "max-time", value_name = "SECS")]
    pub max_time: Option<u64>,

    /// After stopping, wait at most this many seconds for in-flight probes
    #[arg(long, value_name = "SECS")]
    pub grace: Option<u64>,

    /// Verify TLS certificates
    #[arg(long)]
    pub verify_ssl: bool,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Also write the scan record as JSON to this file
    #[arg(short = 'o', long, value_name = "FILE")]
    pub save: Option<PathBuf>,

    /// Don't save the scan to history
    #[arg(long)]
    pub no_save: bool,
}

impl ScanArgs {
    /// Overlay command-line flags on the loaded settings.
    pub fn apply(&self, settings: &mut AppSettings) {
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_secs = timeout;
        }
        if let Some(rate) = self.rate_limit {
            settings.rate_limit = rate;
        }
        if self.verify_ssl {
            settings.verify_ssl = true;
        }
    }

    /// Add the scan-level limits to engine options.
    pub fn limits(&self, options: EngineOptions) -> EngineOptions {
        options
            .with_deadline(self.max_time.map(Duration::from_secs))
            .with_grace(self.grace.map(Duration::from_secs))
    }

    /// The requested output format, falling back to the configured default.
    pub fn output_format(&self, settings: &AppSettings) -> OutputFormat {
        self.format
            .or_else(|| OutputFormat::from_str(&settings.default_output_format, true).ok())
            .unwrap_or_default()
    }
}

/// State shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Context {
    pub quiet: bool,
    pub settings: AppSettings,
}

impl Context {
    /// Directory holding the bundled wordlists, when the data dir is usable.
    pub fn wordlists_dir(&self) -> Option<PathBuf> {
        Paths::get().ok().map(Paths::wordlists_dir)
    }

    /// Progress bars unless quiet.
    pub fn reporters(&self) -> impl Fn(usize, &'static str) -> Box<dyn ProgressReporter> + Sync {
        let quiet = self.quiet;
        move |total, phase| -> Box<dyn ProgressReporter> {
            if quiet {
                Box::new(SilentReporter)
            } else {
                Box::new(BarReporter::new(total, phase))
            }
        }
    }
}

/// Persist and print a finished scan.
///
/// Persistence failures are reported but never discard the results.
pub(crate) fn finish_scan(record: &ScanRecord, args: &ScanArgs, ctx: &Context, settings: &AppSettings) -> CliResult<()> {
    let format = args.output_format(settings);

    let mut sinks: Vec<Box<dyn ResultSink>> = Vec::new();
    if settings.auto_save_scans && !args.no_save {
        match ScanStore::new() {
            Ok(store) => sinks.push(Box::new(store)),
            Err(e) => output::print_warning(&format!("scan history unavailable: {}", e)),
        }
    }
    if let Some(path) = &args.save {
        sinks.push(Box::new(JsonFileSink::new(path)));
    }

    for sink in &sinks {
        match sink.persist(record) {
            Ok(()) if !ctx.quiet => output::print_info(&format!(
                "Scan {} saved to {}",
                record.id.short(),
                sink.describe()
            )),
            Ok(()) => {}
            Err(e) => output::print_warning(&format!("failed to save to {}: {}", sink.describe(), e)),
        }
    }

    if let Some(note) = record.partial_note().filter(|_| !ctx.quiet) {
        output::print_warning(&format!("{}; results are partial", note));
    }

    output::print_results(record, format)?;
    Ok(())
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Plain
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dir_command() {
        let cli = Cli::try_parse_from([
            "voidex", "-v", "dir", "example.com", "-c", "20", "-x", "php,html", "--format", "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Dir(cmd) => {
                assert_eq!(cmd.url, "example.com");
                assert_eq!(cmd.scan.concurrency, Some(20));
                assert_eq!(cmd.extensions, vec!["php", "html"]);
                assert_eq!(cmd.scan.format, Some(OutputFormat::Json));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_settings() {
        let args = ScanArgs {
            concurrency: Some(5),
            timeout: Some(3),
            verify_ssl: true,
            max_time: Some(60),
            ..Default::default()
        };
        let mut settings = AppSettings::default();
        args.apply(&mut settings);

        assert_eq!(settings.concurrency, 5);
        assert_eq!(settings.timeout_secs, 3);
        assert_eq!(settings.rate_limit, 0);
        assert!(settings.verify_ssl);

        let options = args.limits(settings.engine_options());
        assert_eq!(options.deadline, Some(Duration::from_secs(60)));
        assert_eq!(options.grace, None);
    }

    #[test]
    fn test_subdomain_timeout_flag_sets_verification_timeout() {
        let cli = Cli::try_parse_from([
            "voidex", "subdomain", "example.com", "-t", "2", "--dns-timeout", "800", "--verify-concurrency", "4",
        ])
        .unwrap();
        let Commands::Subdomain(cmd) = cli.command else {
            panic!("expected the subdomain command");
        };

        let mut settings = AppSettings::default();
        cmd.apply(&mut settings);

        assert_eq!(settings.verify_http().timeout, Duration::from_secs(2));
        assert_eq!(settings.dns_timeout(), Duration::from_millis(800));
        assert_eq!(settings.verify_concurrency, 4);

        let scan = crate::discovery::SubdomainScan::from_settings(&cmd.domain, &settings);
        assert_eq!(scan.verify_http.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_output_format_falls_back_to_settings() {
        let settings = AppSettings {
            default_output_format: "csv".to_string(),
            ..Default::default()
        };
        assert_eq!(ScanArgs::default().output_format(&settings), OutputFormat::Csv);

        let args = ScanArgs {
            format: Some(OutputFormat::Json),
            ..Default::default()
        };
        assert_eq!(args.output_format(&settings), OutputFormat::Json);
    }
}
