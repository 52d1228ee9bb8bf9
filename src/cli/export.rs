//! Export subcommand implementation.
//!
//! Handles the `voidex export <scan-id>` command for exporting scan results.

use super::{Context, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output;
use crate::storage::{ScanRecord, ScanStore};
use crate::types::ScanId;
use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// Export scan results.
#[derive(Parser, Debug)]
pub struct ExportCommand {
    /// Scan ID or prefix to export
    ///
    /// Can be a full UUID or the first few characters (short ID).
    #[arg(value_name = "SCAN_ID")]
    pub scan_id: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Output file path (prints to stdout if not specified)
    #[arg(short = 'o', long = "output")]
    pub output_file: Option<PathBuf>,

    /// Export only verified subdomains
    #[arg(long)]
    pub verified_only: bool,
}

impl ExportCommand {
    /// Execute the export command.
    pub fn execute(&self, ctx: &Context) -> CliResult<()> {
        let store = ScanStore::new()?;

        let mut record = if self.scan_id.len() < 36 {
            store.find_by_prefix(&self.scan_id)?
        } else {
            let id: ScanId = self.scan_id.parse()?;
            store.load(&id)?
        };

        if self.verified_only {
            record.results = std::mem::take(&mut record.verified);
        }

        if let Some(path) = &self.output_file {
            console::set_colors_enabled(false);
            let content = render(&record, self.format)?;
            fs::write(path, content).map_err(|e| CliError::Other(format!("failed to write file: {}", e)))?;

            if !ctx.quiet {
                output::print_success(&format!("Exported scan {} to {}", record.id.short(), path.display()));
            }
        } else {
            io::stdout().write_all(&render(&record, self.format)?)?;
        }

        Ok(())
    }
}

/// Render `record` in `format` into a buffer.
fn render(record: &ScanRecord, format: OutputFormat) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Json => output::write_json(&mut buf, record)?,
        OutputFormat::Csv => output::write_csv(&mut buf, record)?,
        OutputFormat::Plain => output::write_plain(&mut buf, record)?,
    }
    Ok(buf)
}
