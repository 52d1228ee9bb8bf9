//! Progress reporting.
//!
//! Reporters are told about every finished probe. They have no say in
//! scheduling and must return quickly.

use indicatif::{ProgressBar, ProgressStyle};

/// Receives one notification per completed probe.
pub trait ProgressReporter: Send + Sync {
    /// Called after each probe finishes, whatever its outcome.
    fn on_complete(&self, done: usize, total: usize);

    /// Called when a probe produced an accepted hit.
    fn on_accept(&self, _description: &str) {}

    /// Called once when the scan loop exits.
    fn finish(&self) {}
}

/// Reporter that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn on_complete(&self, _done: usize, _total: usize) {}
}

/// Terminal progress bar.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    const TEMPLATE: &'static str =
        "{spinner:.green} {prefix} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

    /// Create a progress bar for `total` candidates.
    pub fn new(total: usize, prefix: impl Into<String>) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template(Self::TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        bar.set_style(style);
        bar.set_prefix(prefix.into());
        Self { bar }
    }
}

impl ProgressReporter for BarReporter {
    fn on_complete(&self, done: usize, _total: usize) {
        self.bar.set_position(done as u64);
    }

    fn on_accept(&self, description: &str) {
        self.bar.println(format!("  [+] {}", description));
    }

    fn finish(&self) {
        self.bar.finish_with_message("done");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_reporter_tracks_position() {
        let reporter = BarReporter::new(10, "dir");
        reporter.on_complete(3, 10);
        assert_eq!(reporter.bar.position(), 3);
        reporter.finish();
        assert!(reporter.bar.is_finished());
    }
}
