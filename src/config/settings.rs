//! Application settings and paths.
//!
//! Manages XDG-compliant paths for configuration and data.

use crate::engine::{AcceptancePredicate, EngineOptions, DEFAULT_VALID_STATUSES};
use crate::error::{ConfigError, ConfigResult};
use crate::probe::verify::DEFAULT_STATUS_CEILING;
use crate::probe::HttpSettings;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Global paths singleton.
static PATHS: OnceLock<Paths> = OnceLock::new();

/// Application directory paths following XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/voidex)
    pub config_dir: PathBuf,
    /// Data directory (~/.local/share/voidex)
    pub data_dir: PathBuf,
}

impl Paths {
    /// Get the global paths instance, creating the directories on first use.
    pub fn get() -> ConfigResult<&'static Paths> {
        if let Some(paths) = PATHS.get() {
            return Ok(paths);
        }
        let paths = Self::new()?;
        Ok(PATHS.get_or_init(|| paths))
    }

    /// Initialize paths using XDG directories.
    fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "voidex", "voidex").ok_or(ConfigError::DirectoryNotFound)?;

        let paths = Self {
            config_dir: project.config_dir().to_path_buf(),
            data_dir: project.data_dir().to_path_buf(),
        };

        fs::create_dir_all(&paths.config_dir)?;
        fs::create_dir_all(&paths.data_dir)?;

        Ok(paths)
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("config.yaml")
    }

    /// Directory holding the bundled wordlists.
    pub fn wordlists_dir(&self) -> PathBuf {
        self.data_dir.join("wordlists")
    }

    /// Get the path to the scans storage directory.
    pub fn scans_dir(&self) -> PathBuf {
        self.data_dir.join("scans")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum probes in flight.
    pub concurrency: usize,
    /// Maximum HTTP verification requests in flight.
    pub verify_concurrency: usize,
    /// DNS lookup timeout in milliseconds.
    pub dns_timeout_ms: u64,
    /// HTTP verification timeout in seconds.
    pub verify_timeout_secs: u64,
    /// Verify TLS certificates.
    pub verify_ssl: bool,
    /// User agents rotated per request.
    pub user_agents: Vec<String>,
    /// Maximum probe starts per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Status codes reported by directory scans.
    pub valid_statuses: Vec<u16>,
    /// Verification accepts any status below this.
    pub verify_status_ceiling: u16,
    /// Default output format.
    pub default_output_format: String,
    /// Auto-save scan results.
    pub auto_save_scans: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            concurrency: 50,
            verify_concurrency: 10,
            dns_timeout_ms: 2000,
            verify_timeout_secs: 5,
            verify_ssl: false,
            user_agents: vec![
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string(),
            ],
            rate_limit: 0,
            valid_statuses: DEFAULT_VALID_STATUSES.to_vec(),
            verify_status_ceiling: DEFAULT_STATUS_CEILING,
            default_output_format: "plain".to_string(),
            auto_save_scans: true,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::get()?.settings_file();
        if !file.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&file)
    }

    /// Load settings from a specific file. YAML for `.yaml`/`.yml`, JSON otherwise.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if is_yaml(path) {
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(serde_json::from_str(&content)?)
        }
    }

    /// HTTP client settings for path probes.
    pub fn http(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            verify_ssl: self.verify_ssl,
            user_agents: self.user_agents.clone(),
        }
    }

    /// HTTP client settings for subdomain verification.
    pub fn verify_http(&self) -> HttpSettings {
        HttpSettings {
            timeout: Duration::from_secs(self.verify_timeout_secs),
            ..self.http()
        }
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_timeout_ms)
    }

    /// Engine options for the main probing pass.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::default()
            .with_concurrency(self.concurrency)
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_rate_limit(self.rate_limit)
    }

    /// Acceptance rule for directory scans.
    pub fn predicate(&self) -> AcceptancePredicate {
        AcceptancePredicate::statuses(self.valid_statuses.iter().copied())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
