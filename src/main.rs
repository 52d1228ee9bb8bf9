//! VOIDEX command-line entry point.

use anyhow::{Context as _, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use voidex::cli::{Cli, Commands, Context};
use voidex::config::AppSettings;
use voidex::output;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "voidex=info" } else { "voidex=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => AppSettings::load_from(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppSettings::load().unwrap_or_else(|e| {
            warn!(error = %e, "using default settings");
            AppSettings::default()
        }),
    };

    if !cli.no_banner && !cli.quiet {
        output::print_banner();
    }

    let ctx = Context {
        quiet: cli.quiet,
        settings,
    };

    match &cli.command {
        Commands::Dir(cmd) => cmd.execute(&ctx).await?,
        Commands::Subdomain(cmd) => cmd.execute(&ctx).await?,
        Commands::History(cmd) => cmd.execute(&ctx)?,
        Commands::Export(cmd) => cmd.execute(&ctx)?,
    }

    Ok(())
}
