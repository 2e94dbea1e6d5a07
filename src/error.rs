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

//! Error types for Library Desk
//!
//! This module defines error types using thiserror for ergonomic error handling.
//! Errors are split by where they originate:
//!
//! ### Persistence (raised by the storage layer)
//! - Driver, connectivity and constraint failures → `Persistence` (via `#[from]`)
//! - Schema creation failures → `MigrationFailed`
//!
//! ### Domain rules (raised by the stores and the ledger)
//! - Unknown book, customer or loan → `RecordNotFound`
//! - Checkout of an unavailable book, mismatched return → `Conflict`
//!
//! ### Validation (raised at the presentation boundary)
//! - Empty form fields → `MissingRequiredField`
//! - Non-numeric identifiers, reversed report ranges → `InvalidInput`
//! - Malformed report dates → `InvalidDate`
//!
//! ### Configuration
//! - Bad or unreadable config file → `ConfigurationError`, `FileIoError`

use thiserror::Error;

/// Result type alias using our LibraryError type
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Main error type for Library Desk
#[derive(Error, Debug)]
pub enum LibraryError {
    // ===== Persistence Errors =====

    /// Database driver error from sqlx (connectivity, constraint violation, bad statement)
    #[error("Database error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// Database schema migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    // ===== Domain Errors =====

    /// Book, customer or loan does not exist
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Operation conflicts with the current lending state
    #[error("Conflict: {0}")]
    Conflict(String),

    // ===== Validation Errors =====

    /// Generic input validation error
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required field is missing or blank
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// Date string is not a valid YYYY-MM-DD calendar date
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    // ===== Configuration/File Errors =====

    /// Configuration file error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// File I/O error with context
    #[error("File I/O error: {0}")]
    FileIoError(String),
}

impl From<std::num::ParseIntError> for LibraryError {
    fn from(err: std::num::ParseIntError) -> Self {
        LibraryError::InvalidInput(format!("Failed to parse integer: {}", err))
    }
}

// Helper methods for creating common errors
impl LibraryError {
    /// Create a RecordNotFound error with a resource name
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        LibraryError::RecordNotFound(resource.into())
    }

    /// Create a Conflict error with a message
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        LibraryError::Conflict(message.into())
    }

    /// Create an InvalidInput error with a message
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        LibraryError::InvalidInput(message.into())
    }

    /// Errors produced before the core is reached (bad user input)
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            LibraryError::InvalidInput(_)
                | LibraryError::MissingRequiredField(_)
                | LibraryError::InvalidDate(_)
        )
    }

    /// Errors raised by the database layer
    pub fn is_persistence_error(&self) -> bool {
        matches!(
            self,
            LibraryError::Persistence(_) | LibraryError::MigrationFailed(_)
        )
    }

    /// Get user-friendly error message suitable for display
    ///
    /// Persistence failures are reported without the driver detail; that goes
    /// to the log instead.
    pub fn user_message(&self) -> String {
        match self {
            LibraryError::Persistence(_) | LibraryError::MigrationFailed(_) => {
                "The database rejected the operation. See the log for details.".to_string()
            }
            LibraryError::MissingRequiredField(_) => "All fields are required!".to_string(),
            LibraryError::InvalidDate(_) => "Invalid date format! Use YYYY-MM-DD.".to_string(),
            _ => self.to_string(),
        }
    }
}
