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

//! Logging setup
//!
//! Installs a global `tracing` subscriber. `RUST_LOG` wins over the
//! configured level. With a log file configured, lines are appended to it
//! without ANSI colors; otherwise they go to stderr.

use crate::config::LoggingConfig;
use crate::error::{LibraryError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber; fails if one is already installed
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| {
            LibraryError::ConfigurationError(format!("Invalid log level '{}': {}", config.level, e))
        })?;

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    LibraryError::FileIoError(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| LibraryError::ConfigurationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_to_file_once() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("library.log");
        let config = LoggingConfig {
            level: "info".to_string(),
            file: Some(path.clone()),
        };

        init(&config).expect("First init failed");
        tracing::error!("log file smoke test");

        let content = std::fs::read_to_string(&path).expect("Log file missing");
        assert!(content.contains("log file smoke test"));

        // The global subscriber can only be installed once
        assert!(init(&config).is_err());
    }
}
