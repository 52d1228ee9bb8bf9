//! Scan result persistence.
//!
//! Sinks are invoked by the caller after a scan returns; the engine itself
//! never persists anything.

mod json_store;

use crate::error::{StorageError, StorageResult};
use std::fs;
use std::path::PathBuf;

pub use json_store::{ScanRecord, ScanStore};

/// Destination for a finished scan.
pub trait ResultSink {
    /// Write `record`.
    fn persist(&self, record: &ScanRecord) -> StorageResult<()>;

    /// Human-readable destination, for status messages.
    fn describe(&self) -> String;
}

/// Writes one scan record as pretty JSON to a chosen file.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultSink for JsonFileSink {
    fn persist(&self, record: &ScanRecord) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::DirectoryError(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, content).map_err(|e| StorageError::SaveFailed(e.to_string()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
