//! Directory and file discovery against a base URL.

use super::ReporterFactory;
use crate::config::AppSettings;
use crate::engine::{AcceptancePredicate, CancelSignal, Engine, EngineOptions, ScanResult};
use crate::error::{EngineError, EngineResult};
use crate::probe::{HttpSettings, PathProbe, ProbeStrategy};
use crate::types::BaseUrl;
use crate::wordlist::{Wordlist, WordlistKind};
use std::path::PathBuf;
use tracing::info;

/// A configured directory scan.
#[derive(Debug, Clone)]
pub struct DirectoryScan {
    pub url: String,
    pub wordlist: Option<PathBuf>,
    pub bundled_dir: Option<PathBuf>,
    pub extensions: Vec<String>,
    pub predicate: AcceptancePredicate,
    pub http: HttpSettings,
    pub options: EngineOptions,
}

impl DirectoryScan {
    /// A scan of `url` with built-in defaults.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            wordlist: None,
            bundled_dir: None,
            extensions: Vec::new(),
            predicate: AcceptancePredicate::default(),
            http: HttpSettings::default(),
            options: EngineOptions::default(),
        }
    }

    /// A scan of `url` configured from application settings.
    pub fn from_settings(url: impl Into<String>, settings: &AppSettings) -> Self {
        Self {
            predicate: settings.predicate(),
            http: settings.http(),
            options: settings.engine_options(),
            ..Self::new(url)
        }
    }

    pub fn with_wordlist(mut self, path: Option<PathBuf>) -> Self {
        self.wordlist = path;
        self
    }

    pub fn with_bundled_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.bundled_dir = dir;
        self
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// The candidates this scan will probe, in order.
    pub fn candidates(&self) -> Wordlist {
        Wordlist::load_or_default(
            self.wordlist.as_deref(),
            WordlistKind::Directories,
            self.bundled_dir.as_deref(),
        )
        .with_extensions(&self.extensions)
    }

    /// Validate the target and run the scan.
    pub async fn run(&self, cancel: &CancelSignal, reporters: ReporterFactory<'_>) -> EngineResult<ScanResult> {
        let base = BaseUrl::parse(&self.url)?;
        let engine = Engine::new(self.options.clone())?;
        let wordlist = self.candidates();
        if wordlist.is_empty() {
            return Err(EngineError::EmptyWordlist);
        }
        info!(target = %base, paths = wordlist.len(), "directory scan");

        // Keep the client inside the engine's per-probe timeout.
        let mut http = self.http.clone();
        http.timeout = http.timeout.min(self.options.probe_timeout);

        let target = base.to_string();
        let probe = ProbeStrategy::from(PathProbe::new(base, http)?);
        let reporter = reporters(wordlist.len(), "paths");
        Ok(engine
            .scan(
                &target,
                wordlist.as_slice(),
                &probe,
                &self.predicate,
                cancel,
                reporter.as_ref(),
            )
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::silent;
    use crate::probe::path::test_server::{response, spawn};
    use crate::types::TargetError;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_wordlist(dir: &TempDir, words: &str) -> PathBuf {
        let path = dir.path().join("words.txt");
        fs::write(&path, words).unwrap();
        path
    }

    #[tokio::test]
    async fn test_scan_reports_valid_statuses_sorted() {
        let addr = spawn(|path| match path {
            "/admin" => response("200 OK", "", "admin panel"),
            "/old" => response("301 Moved Permanently", "Location: /new\r\n", ""),
            "/private" => response("403 Forbidden", "", ""),
            "/index.php" => response("200 OK", "", "<?php"),
            _ => response("404 Not Found", "", ""),
        })
        .await;

        let dir = TempDir::new().unwrap();
        let words = write_wordlist(&dir, "private\nold\nmissing\nadmin\nindex\n");

        let mut scan = DirectoryScan::new(format!("127.0.0.1:{}", addr.port()))
            .with_wordlist(Some(words))
            .with_extensions(vec!["php".to_string()]);
        scan.options = scan.options.with_concurrency(4).with_timeout(Duration::from_secs(5));

        let result = scan.run(&CancelSignal::new(), &silent).await.unwrap();

        let found: Vec<(&str, Option<u16>)> = result
            .accepted
            .iter()
            .map(|h| (h.target.as_str(), h.status_code))
            .collect();
        assert_eq!(
            found,
            vec![
                ("admin", Some(200)),
                ("index.php", Some(200)),
                ("old", Some(301)),
                ("private", Some(403)),
            ]
        );
        assert_eq!(result.total_candidates, 10);
        assert_eq!(result.target_description, format!("http://127.0.0.1:{}/", addr.port()));
    }

    #[tokio::test]
    async fn test_invalid_url_is_fatal() {
        let scan = DirectoryScan::new("ftp://example.com");
        let err = scan.run(&CancelSignal::new(), &silent).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidTarget(TargetError::UnsupportedScheme(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_wordlist_is_fatal() {
        let dir = TempDir::new().unwrap();
        let words = write_wordlist(&dir, "# nothing here\n\n");

        let scan = DirectoryScan::new("http://127.0.0.1:1/").with_wordlist(Some(words));
        let err = scan.run(&CancelSignal::new(), &silent).await.unwrap_err();
        assert!(matches!(err, EngineError::EmptyWordlist));
    }

    #[test]
    fn test_missing_wordlist_falls_back() {
        let scan = DirectoryScan::new("http://x/").with_wordlist(Some(PathBuf::from("/nonexistent.txt")));
        assert!(scan.candidates().len() > 50);
    }
}
