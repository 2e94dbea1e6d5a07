// Library Desk - Library Management Core
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Application configuration
//!
//! Loaded from a JSON file, then overridden by environment variables:
//! - `LIBRARY_DESK_DB`: database file path
//! - `LIBRARY_DESK_LOG`: log file path (empty string logs to stderr)
//!
//! ```json
//! {
//!   "database_path": "/var/lib/library/library.db",
//!   "logging": { "level": "info", "file": "library.log" }
//! }
//! ```

use crate::error::{LibraryError, Result};
use crate::storage::Database;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "LIBRARY_DESK_DB";
pub const LOG_FILE_ENV: &str = "LIBRARY_DESK_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub database_path: PathBuf,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    pub level: String,
    /// Append log lines to this file; `None` writes to stderr
    pub file: Option<PathBuf>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            database_path: Database::get_default_path(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some(PathBuf::from("library.log")),
        }
    }
}

impl LibraryConfig {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LibraryError::FileIoError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: LibraryConfig = serde_json::from_str(&content).map_err(|e| {
            LibraryError::ConfigurationError(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply `LIBRARY_DESK_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(DB_PATH_ENV).ok(),
            std::env::var(LOG_FILE_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, db_path: Option<String>, log_file: Option<String>) {
        if let Some(db_path) = db_path.filter(|p| !p.trim().is_empty()) {
            self.database_path = PathBuf::from(db_path);
        }
        if let Some(log_file) = log_file {
            self.logging.file = if log_file.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(log_file))
            };
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(LibraryError::ConfigurationError(
                "database_path must not be empty".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(LibraryError::ConfigurationError(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        write!(file, r#"{{ "database_path": "/tmp/books.db" }}"#).unwrap();

        let config = LibraryConfig::load(file.path()).expect("Failed to load config");
        assert_eq!(config.database_path, PathBuf::from("/tmp/books.db"));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "database_path = 'toml?'").unwrap();

        assert!(matches!(
            LibraryConfig::load(file.path()),
            Err(LibraryError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_load_rejects_empty_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "database_path": "" }}"#).unwrap();

        assert!(LibraryConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            LibraryConfig::load("/nonexistent/library-desk.json"),
            Err(LibraryError::FileIoError(_))
        ));
    }

    #[test]
    fn test_from_env_reads_overrides() {
        std::env::set_var(DB_PATH_ENV, "/srv/desk/library.db");
        std::env::set_var(LOG_FILE_ENV, "");
        let config = LibraryConfig::from_env();
        std::env::remove_var(DB_PATH_ENV);
        std::env::remove_var(LOG_FILE_ENV);

        assert_eq!(config.database_path, PathBuf::from("/srv/desk/library.db"));
        assert_eq!(config.logging.file, None);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_overrides() {
        let mut config = LibraryConfig::default();
        config.apply_overrides(Some("/data/lib.db".into()), Some(String::new()));
        assert_eq!(config.database_path, PathBuf::from("/data/lib.db"));
        assert_eq!(config.logging.file, None);

        config.apply_overrides(Some("  ".into()), Some("desk.log".into()));
        assert_eq!(config.database_path, PathBuf::from("/data/lib.db"));
        assert_eq!(config.logging.file, Some(PathBuf::from("desk.log")));
    }
}
