//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan results.
//! Reports go to stdout; status messages and the banner go to stderr.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_csv, write_csv};
pub use json_format::{print_json, write_json};
pub use plain::{
    print_banner, print_error, print_info, print_plain, print_scan_header, print_success, print_warning,
    write_plain,
};

use crate::cli::OutputFormat;
use crate::storage::ScanRecord;
use std::io;

/// Format and print scan results according to the specified format.
pub fn print_results(record: &ScanRecord, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => print_plain(record),
        OutputFormat::Json => print_json(record),
        OutputFormat::Csv => print_csv(record),
    }
}
