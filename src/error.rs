//! Error types for voidex.
//!
//! Uses `thiserror` for ergonomic error definitions. Only engine and target
//! errors are fatal to a scan; probe errors are recorded per candidate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::{ScanIdError, TargetError};

/// Errors that stop a scan before any probe runs.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid concurrency limit {0}: must be at least 1")]
    InvalidConcurrency(usize),

    #[error("invalid probe timeout: must be greater than zero")]
    InvalidTimeout,

    #[error("invalid target: {0}")]
    InvalidTarget(#[from] TargetError),

    #[error("wordlist is empty")]
    EmptyWordlist,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failure of a single probe. Never aborts the scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("probe timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("DNS resolution failed: {0}")]
    Dns(String),
}

impl ProbeError {
    /// Classify this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout => ErrorKind::Timeout,
            Self::ConnectionFailed(_) => ErrorKind::ConnectionFailed,
            Self::Protocol(_) => ErrorKind::ProtocolError,
            Self::Dns(_) => ErrorKind::DnsFailure,
        }
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else if e.is_body() || e.is_decode() || e.is_redirect() || e.is_builder() {
            Self::Protocol(e.to_string())
        } else {
            Self::ConnectionFailed(e.to_string())
        }
    }
}

/// Result type alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Classification of a failed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Timeout,
    ConnectionFailed,
    ProtocolError,
    DnsFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::ConnectionFailed => write!(f, "connection failed"),
            Self::ProtocolError => write!(f, "protocol error"),
            Self::DnsFailure => write!(f, "dns failure"),
        }
    }
}

/// Wordlist loading errors.
#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("wordlist not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read wordlist {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Scan storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("scan not found: {0}")]
    ScanNotFound(String),

    #[error("failed to save scan: {0}")]
    SaveFailed(String),

    #[error("failed to load scan: {0}")]
    LoadFailed(String),

    #[error("storage directory error: {0}")]
    DirectoryError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::SaveFailed(e.to_string())
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Top-level error for CLI commands.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Wordlist(#[from] WordlistError),

    #[error(transparent)]
    ScanId(#[from] ScanIdError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_error_kind() {
        assert_eq!(ProbeError::Timeout.kind(), ErrorKind::Timeout);
        assert_eq!(
            ProbeError::ConnectionFailed("refused".into()).kind(),
            ErrorKind::ConnectionFailed
        );
        assert_eq!(ProbeError::Protocol("bad".into()).kind(), ErrorKind::ProtocolError);
        assert_eq!(ProbeError::Dns("servfail".into()).kind(), ErrorKind::DnsFailure);
    }

    #[test]
    fn test_error_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::DnsFailure).unwrap();
        assert_eq!(json, "\"dns_failure\"");
    }
}
