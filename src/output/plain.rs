//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::discovery::ScanKind;
use crate::probe::Hit;
use crate::storage::ScanRecord;
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print results in human-readable plain text format.
pub fn print_plain(record: &ScanRecord) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plain(&mut out, record)
}

/// Write the plain text report for `record` to `out`.
pub fn write_plain(out: &mut impl Write, record: &ScanRecord) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out, "                    {} Scan Results", style("VOIDEX").cyan().bold())?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), record.target)?;
    writeln!(out, "  {} {}", style("Tool:").bold(), record.kind)?;
    writeln!(out, "  {} {}", style("Scan ID:").bold(), style(record.id.short()).dim())?;
    writeln!(out)?;

    let stats = &record.stats;
    writeln!(
        out,
        "  {} {} of {} candidates probed in {:.2}s",
        style("Statistics:").bold(),
        stats.completed,
        record.total_candidates,
        record.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "               {} found, {} not found, {} errored",
        style(stats.found).green().bold(),
        style(stats.not_found).dim(),
        style(stats.errored).red()
    )?;
    if !stats.errors_by_kind.is_empty() {
        let kinds: Vec<String> = stats
            .errors_by_kind
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();
        writeln!(out, "               {}", style(kinds.join(", ")).dim())?;
    }
    if record.stop_reason.is_partial() {
        writeln!(
            out,
            "  {} scan stopped early ({}); {} candidates never probed",
            style("Partial:").yellow().bold(),
            record.stop_reason,
            record.total_candidates.saturating_sub(stats.admitted)
        )?;
    }
    writeln!(out)?;

    match record.kind {
        ScanKind::Directory => write_paths(out, &record.results)?,
        ScanKind::Subdomain => {
            write_hosts(out, &record.results)?;
            if !record.verified.is_empty() {
                writeln!(out)?;
                writeln!(out, "  {}", style("Verified over HTTP(S):").bold())?;
                write_paths(out, &record.verified)?;
            }
            if let Some(reason) = record.verification.filter(|r| r.is_partial()) {
                writeln!(out)?;
                writeln!(
                    out,
                    "  {} verification stopped early ({}); some hosts were not checked",
                    style("Partial:").yellow().bold(),
                    reason
                )?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;
    Ok(())
}

fn write_paths(out: &mut impl Write, hits: &[Hit]) -> io::Result<()> {
    if hits.is_empty() {
        return writeln!(out, "  {}", style("Nothing found.").dim());
    }

    writeln!(out, "  {}", style(THIN_RULE).dim())?;
    writeln!(
        out,
        "  {:>6}  {:>10}  {}",
        style("STATUS").bold(),
        style("SIZE").bold(),
        style("URL").bold()
    )?;
    writeln!(out, "  {}", style(THIN_RULE).dim())?;

    for hit in hits {
        let status = hit.status_code.map_or_else(|| "-".to_string(), |s| s.to_string());
        let size = hit.byte_size.map_or_else(String::new, |s| s.to_string());
        writeln!(
            out,
            "  {:>6}  {:>10}  {}",
            status_style(hit.status_code).apply_to(status),
            size,
            hit.resolved_url
        )?;
    }

    writeln!(out, "  {}", style(THIN_RULE).dim())
}

fn write_hosts(out: &mut impl Write, hits: &[Hit]) -> io::Result<()> {
    if hits.is_empty() {
        return writeln!(out, "  {}", style("No subdomains found.").dim());
    }

    writeln!(out, "  {}", style(THIN_RULE).dim())?;
    writeln!(out, "  {:<40}  {}", style("HOST").bold(), style("ADDRESSES").bold())?;
    writeln!(out, "  {}", style(THIN_RULE).dim())?;

    for hit in hits {
        let addrs: Vec<String> = hit.addresses.iter().map(ToString::to_string).collect();
        writeln!(
            out,
            "  {:<40}  {}",
            style(&hit.resolved_url).green(),
            style(addrs.join(", ")).dim()
        )?;
    }

    writeln!(out, "  {}", style(THIN_RULE).dim())
}

/// Color for an HTTP status: 2xx green, 3xx yellow, 401/403 cyan, else red.
fn status_style(status: Option<u16>) -> Style {
    match status {
        Some(200..=299) => Style::new().green().bold(),
        Some(300..=399) => Style::new().yellow(),
        Some(401) | Some(403) => Style::new().cyan(),
        _ => Style::new().red(),
    }
}

/// Print the startup banner.
pub fn print_banner() {
    eprintln!("{}", style(RULE).cyan());
    eprintln!(
        "  {} v{}  {}",
        style("VOIDEX").cyan().bold(),
        env!("CARGO_PKG_VERSION"),
        style("directory & subdomain discovery").dim()
    );
    eprintln!(
        "  {}",
        style("Only scan systems you own or are authorized to test.").yellow()
    );
    eprintln!("{}", style(RULE).cyan());
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(tool: ScanKind, target: &str, concurrency: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("VOIDEX").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("{} Tool: {}", style("•").dim(), style(tool).yellow());
    eprintln!("{} Target: {}", style("•").dim(), style(target).white().bold());
    eprintln!(
        "{} Probing with up to {} requests in flight...",
        style("•").dim(),
        style(concurrency).white().bold()
    );
    eprintln!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    eprintln!("{} {}", style("ℹ").blue().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StopReason;
    use crate::error::ErrorKind;

    fn render(record: &ScanRecord) -> String {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        write_plain(&mut buf, record).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_directory_report() {
        let mut record = ScanRecord::new(ScanKind::Directory, "http://t/");
        record.total_candidates = 3;
        record.stats.completed = 3;
        record.stats.found = 2;
        record.stats.errored = 1;
        record.stats.errors_by_kind.insert(ErrorKind::Timeout, 1);
        record.results = vec![Hit::http("admin", "http://t/admin", 200, 42)];

        let text = render(&record);
        assert!(text.contains("Target: http://t/"));
        assert!(text.contains("3 of 3 candidates"));
        assert!(text.contains("1 timeout"));
        assert!(text.contains("http://t/admin"));
        assert!(text.contains("42"));
        assert!(!text.contains("Partial:"));
    }

    #[test]
    fn test_partial_subdomain_report() {
        let mut record = ScanRecord::new(ScanKind::Subdomain, "x.com");
        record.total_candidates = 10;
        record.stats.admitted = 4;
        record.stop_reason = StopReason::Cancelled;
        record.results = vec![Hit::resolved("www", "www.x.com", vec!["10.0.0.1".parse().unwrap()])];
        record.verified = vec![Hit::http("www.x.com", "https://www.x.com/", 200, 0)];

        let text = render(&record);
        assert!(text.contains("Partial: scan stopped early (cancelled); 6 candidates never probed"));
        assert!(text.contains("www.x.com"));
        assert!(text.contains("10.0.0.1"));
        assert!(text.contains("Verified over HTTP(S):"));
        assert!(text.contains("https://www.x.com/"));
    }

    #[test]
    fn test_interrupted_verification_is_shown() {
        let mut record = ScanRecord::new(ScanKind::Subdomain, "x.com");
        record.results = vec![Hit::resolved("www", "www.x.com", vec![])];
        record.verification = Some(StopReason::Cancelled);

        let text = render(&record);
        assert!(!text.contains("scan stopped early"));
        assert!(text.contains("Partial: verification stopped early (cancelled); some hosts were not checked"));
    }

    #[test]
    fn test_empty_results() {
        let record = ScanRecord::new(ScanKind::Directory, "http://t/");
        assert!(render(&record).contains("Nothing found."));
    }
}
