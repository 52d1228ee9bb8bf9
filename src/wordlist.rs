//! Wordlist loading.
//!
//! A wordlist is read once, fully, before a scan starts. Lines are trimmed,
//! blank lines and `#` comments are skipped, and duplicates are dropped
//! keeping the first occurrence.

use crate::error::WordlistError;
use crate::types::Candidate;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Minimal built-in directory list.
const DIRECTORIES: &[&str] = &[
    "admin", "login", "administrator", "user", "dashboard", "panel", "config", "backup", "test",
    "dev", "staging", "api", "v1", "v2", "docs", "documentation", "help", "uploads", "files",
    "images", "img", "css", "js", "assets", "static", "media", "download", "downloads",
    "backup.zip", "backup.sql", "config.php", "config.json", ".git", ".env", ".htaccess",
    "robots.txt", "sitemap.xml", "phpinfo.php", "info.php", "test.php", "shell.php", "wp-admin",
    "wp-content", "wp-includes", "wordpress", "phpmyadmin", "pma", "mysql", "database", "db",
    "cgi-bin", "scripts", "bin", "tmp", "temp",
];

/// Minimal built-in subdomain list.
const SUBDOMAINS: &[&str] = &[
    "www", "mail", "ftp", "localhost", "webmail", "smtp", "pop", "ns1", "ns2", "webdisk", "ns",
    "admin", "blog", "dev", "test", "staging", "api", "app", "mobile", "m", "shop", "store", "news",
    "forum", "help", "support", "portal", "client", "vpn", "remote", "secure", "server", "host",
    "backup",
];

/// Which built-in list to fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordlistKind {
    Directories,
    Subdomains,
}

impl WordlistKind {
    /// File name of the bundled list in the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Directories => "directories.txt",
            Self::Subdomains => "subdomains.txt",
        }
    }

    fn builtin(self) -> &'static [&'static str] {
        match self {
            Self::Directories => DIRECTORIES,
            Self::Subdomains => SUBDOMAINS,
        }
    }
}

impl fmt::Display for WordlistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directories => write!(f, "directories"),
            Self::Subdomains => write!(f, "subdomains"),
        }
    }
}

/// An ordered, de-duplicated candidate list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wordlist {
    words: Vec<Candidate>,
}

impl Wordlist {
    /// Build from raw lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let words = lines
            .into_iter()
            .filter_map(|line| {
                let word = line.as_ref().trim();
                if word.is_empty() || word.starts_with('#') || !seen.insert(word.to_string()) {
                    return None;
                }
                Some(Candidate::new(word))
            })
            .collect();
        Self { words }
    }

    /// The built-in list for `kind`.
    pub fn builtin(kind: WordlistKind) -> Self {
        Self::from_lines(kind.builtin())
    }

    /// Read a wordlist file.
    pub fn load(path: &Path) -> Result<Self, WordlistError> {
        if !path.exists() {
            return Err(WordlistError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| WordlistError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let list = Self::from_lines(content.lines());
        debug!(path = %path.display(), words = list.len(), "wordlist loaded");
        Ok(list)
    }

    /// Read `path` if given, otherwise the bundled list under `bundled_dir`,
    /// otherwise the built-in list. Failures along the way are logged.
    pub fn load_or_default(path: Option<&Path>, kind: WordlistKind, bundled_dir: Option<&Path>) -> Self {
        if let Some(path) = path {
            match Self::load(path) {
                Ok(list) => return list,
                Err(e) => warn!(error = %e, "falling back to default {} wordlist", kind),
            }
        }

        if let Some(dir) = bundled_dir {
            let bundled: PathBuf = dir.join(kind.file_name());
            if bundled.exists() {
                match Self::load(&bundled) {
                    Ok(list) if !list.is_empty() => return list,
                    Ok(_) => warn!(path = %bundled.display(), "bundled wordlist is empty"),
                    Err(e) => warn!(error = %e, "bundled wordlist unreadable"),
                }
            }
        }

        Self::builtin(kind)
    }

    /// Append `word + ext` for each extension the word does not already end with.
    pub fn with_extensions<S: AsRef<str>>(self, extensions: &[S]) -> Self {
        let extensions: Vec<String> = extensions
            .iter()
            .map(|e| e.as_ref().trim())
            .filter(|e| !e.is_empty())
            .map(|e| if e.starts_with('.') { e.to_string() } else { format!(".{}", e) })
            .collect();
        if extensions.is_empty() {
            return self;
        }

        let mut expanded = Vec::with_capacity(self.words.len() * (extensions.len() + 1));
        for word in &self.words {
            expanded.push(word.to_string());
            for ext in &extensions {
                if !word.as_str().ends_with(ext.as_str()) {
                    expanded.push(format!("{}{}", word, ext));
                }
            }
        }
        Self::from_lines(expanded)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.words
    }
}
