//! JSON-based scan result storage.
//!
//! Stores each scan as a separate JSON file for simplicity and durability.
//! Supports listing, querying, and exporting scan results.

use super::ResultSink;
use crate::config::Paths;
use crate::discovery::{ScanKind, SubdomainReport};
use crate::engine::{ScanResult, ScanStats, StopReason};
use crate::error::{StorageError, StorageResult};
use crate::probe::Hit;
use crate::types::ScanId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// A persisted scan record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Unique identifier for this scan.
    pub id: ScanId,
    /// When the scan was started.
    pub started_at: DateTime<Utc>,
    /// When the scan completed.
    pub completed_at: DateTime<Utc>,
    /// Tool that produced the scan.
    pub kind: ScanKind,
    /// Normalized base URL or domain.
    pub target: String,
    /// Number of candidates in the wordlist.
    pub total_candidates: usize,
    pub stats: ScanStats,
    pub stop_reason: StopReason,
    /// Total scan duration in milliseconds.
    pub duration_ms: u64,
    /// Accepted hits, in report order.
    pub results: Vec<Hit>,
    /// Subdomains that answered over HTTP(S).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verified: Vec<Hit>,
    /// How the HTTP verification pass ended, if it ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<StopReason>,
}

impl ScanRecord {
    /// Create an empty record for a scan starting now.
    pub fn new(kind: ScanKind, target: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ScanId::new(),
            started_at: now,
            completed_at: now,
            kind,
            target: target.into(),
            total_candidates: 0,
            stats: ScanStats::default(),
            stop_reason: StopReason::Completed,
            duration_ms: 0,
            results: Vec::new(),
            verified: Vec::new(),
            verification: None,
        }
    }

    /// Record for a finished directory scan.
    pub fn directory(result: ScanResult, started_at: DateTime<Utc>) -> Self {
        let mut record = Self::new(ScanKind::Directory, result.target_description.clone()).finalize(result);
        record.started_at = started_at;
        record
    }

    /// Record for a finished subdomain scan.
    pub fn subdomain(report: SubdomainReport, started_at: DateTime<Utc>) -> Self {
        let mut record = Self::new(ScanKind::Subdomain, report.scan.target_description.clone()).finalize(report.scan);
        record.started_at = started_at;
        record.verified = report.verified;
        record.verification = report.verification;
        record
    }

    /// Finalize the scan record with results.
    pub fn finalize(mut self, result: ScanResult) -> Self {
        self.completed_at = Utc::now();
        self.total_candidates = result.total_candidates;
        self.stats = result.stats;
        self.stop_reason = result.stop_reason;
        self.duration_ms = result.duration_ms;
        self.results = result.accepted;
        self
    }

    /// Whether either pass stopped before probing every candidate.
    pub fn is_partial(&self) -> bool {
        self.partial_note().is_some()
    }

    /// Which pass stopped early, and why.
    pub fn partial_note(&self) -> Option<String> {
        if self.stop_reason.is_partial() {
            return Some(format!("scan stopped early ({})", self.stop_reason));
        }
        self.verification
            .filter(|reason| reason.is_partial())
            .map(|reason| format!("verification stopped early ({})", reason))
    }

    /// Get a short summary of the scan.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} {} - {} found of {}",
            self.kind,
            self.target,
            self.results.len(),
            self.total_candidates
        );
        if !self.verified.is_empty() {
            summary.push_str(&format!(", {} verified", self.verified.len()));
        }
        if self.stop_reason.is_partial() {
            summary.push_str(&format!(" ({})", self.stop_reason));
        } else if let Some(reason) = self.verification.filter(|r| r.is_partial()) {
            summary.push_str(&format!(" (verification {})", reason));
        }
        summary.push_str(&format!(" [{:.2}s]", self.duration_ms as f64 / 1000.0));
        summary
    }
}

/// JSON file-based scan storage.
pub struct ScanStore {
    scans_dir: PathBuf,
}

impl ScanStore {
    /// Open the store in the default data directory.
    pub fn new() -> StorageResult<Self> {
        Self::at(Paths::get()?.scans_dir())
    }

    /// Open a store rooted at `scans_dir`, creating it if needed.
    pub fn at(scans_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let scans_dir = scans_dir.into();
        fs::create_dir_all(&scans_dir).map_err(|e| StorageError::DirectoryError(e.to_string()))?;
        Ok(Self { scans_dir })
    }

    /// Save a scan record.
    pub fn save(&self, record: &ScanRecord) -> StorageResult<()> {
        let file = self.scan_file(&record.id);
        let content = serde_json::to_string_pretty(record)?;

        fs::write(&file, content).map_err(|e| StorageError::SaveFailed(e.to_string()))?;
        debug!(id = %record.id, path = %file.display(), "scan saved");
        Ok(())
    }

    /// Load a scan record by ID.
    pub fn load(&self, id: &ScanId) -> StorageResult<ScanRecord> {
        let file = self.scan_file(id);

        if !file.exists() {
            return Err(StorageError::ScanNotFound(id.to_string()));
        }

        let content = fs::read_to_string(&file).map_err(|e| StorageError::LoadFailed(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| StorageError::LoadFailed(e.to_string()))
    }

    /// Find a scan by short ID prefix.
    pub fn find_by_prefix(&self, prefix: &str) -> StorageResult<ScanRecord> {
        let matches: Vec<_> = self
            .list_ids()?
            .into_iter()
            .filter(|id| id.matches_prefix(prefix))
            .collect();

        match matches.len() {
            0 => Err(StorageError::ScanNotFound(prefix.to_string())),
            1 => self.load(&matches[0]),
            _ => Err(StorageError::LoadFailed(format!(
                "ambiguous prefix '{}': {} matches",
                prefix,
                matches.len()
            ))),
        }
    }

    /// List all scan IDs.
    pub fn list_ids(&self) -> StorageResult<Vec<ScanId>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.scans_dir).map_err(|e| StorageError::DirectoryError(e.to_string()))? {
            let entry = entry.map_err(|e| StorageError::DirectoryError(e.to_string()))?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem() {
                    if let Ok(id) = stem.to_string_lossy().parse::<ScanId>() {
                        ids.push(id);
                    }
                }
            }
        }

        Ok(ids)
    }

    /// List all readable scan records, most recent first.
    pub fn list(&self) -> StorageResult<Vec<ScanRecord>> {
        let mut records: Vec<ScanRecord> = self
            .list_ids()?
            .iter()
            .filter_map(|id| self.load(id).ok())
            .collect();

        records.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        Ok(records)
    }

    /// List recent scans (last n).
    pub fn list_recent(&self, count: usize) -> StorageResult<Vec<ScanRecord>> {
        let mut records = self.list()?;
        records.truncate(count);
        Ok(records)
    }

    /// Delete a scan record.
    pub fn delete(&self, id: &ScanId) -> StorageResult<()> {
        let file = self.scan_file(id);

        if !file.exists() {
            return Err(StorageError::ScanNotFound(id.to_string()));
        }

        fs::remove_file(&file).map_err(|e| StorageError::SaveFailed(e.to_string()))
    }

    /// Delete scans older than a given duration.
    pub fn cleanup(&self, max_age: chrono::Duration) -> StorageResult<usize> {
        let cutoff = Utc::now() - max_age;
        let mut deleted = 0;

        for record in self.list()? {
            if record.started_at < cutoff {
                self.delete(&record.id)?;
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    fn scan_file(&self, id: &ScanId) -> PathBuf {
        self.scans_dir.join(format!("{}.json", id))
    }
}

impl ResultSink for ScanStore {
    fn persist(&self, record: &ScanRecord) -> StorageResult<()> {
        self.save(record)
    }

    fn describe(&self) -> String {
        format!("history ({})", self.scans_dir.display())
    }
}
