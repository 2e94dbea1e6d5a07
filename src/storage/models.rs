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

//! Database models for Library Desk
//!
//! Row types map one-to-one to table columns (or to the columns of a
//! reporting join). `New*` types carry the caller-supplied fields for an
//! insert; identifiers are always assigned by the database.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::error::LibraryError;

// ============================================================================
// ENUMS
// ============================================================================

/// Membership status of a customer
///
/// Stored as free text; this enum covers the values the front end offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MembershipStatus {
    Active,
    Inactive,
    Suspended,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipStatus::Active => "Active",
            MembershipStatus::Inactive => "Inactive",
            MembershipStatus::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipStatus {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(MembershipStatus::Active),
            "inactive" => Ok(MembershipStatus::Inactive),
            "suspended" => Ok(MembershipStatus::Suspended),
            other => Err(LibraryError::invalid_input(format!(
                "Unknown membership status '{}'",
                other
            ))),
        }
    }
}

/// Lifecycle state of a loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanState {
    /// No return date recorded yet
    Open,
    /// Returned; terminal
    Closed,
}

// ============================================================================
// BOOKS
// ============================================================================

/// Book row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub isbn: String,
    pub is_available: bool,
}

impl Book {
    /// Search match: `needle` is `term` already lowercased
    pub(crate) fn matches(&self, term: &str, needle: &str) -> bool {
        [&self.title, &self.author, &self.genre]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
            || self.isbn.contains(term)
    }
}

/// Fields for a new book; availability defaults to true in the schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub isbn: String,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        isbn: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            isbn: isbn.into(),
        }
    }
}

// ============================================================================
// CUSTOMERS
// ============================================================================

/// Customer row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub email: String,
    pub membership_status: String,
}

impl Customer {
    /// Parsed membership status, `None` for values outside the known set
    pub fn status(&self) -> Option<MembershipStatus> {
        self.membership_status.parse().ok()
    }
}

/// Fields for a new customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub membership_status: String,
}

impl NewCustomer {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        membership_status: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            membership_status: membership_status.into(),
        }
    }
}

// ============================================================================
// LOANS
// ============================================================================

/// Loan row (table `transactions`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub transaction_id: i64,
    pub book_id: i64,
    pub customer_id: i64,
    pub checkout_date: NaiveDateTime,
    pub due_date: NaiveDateTime,
    pub return_date: Option<NaiveDateTime>,
    pub fine: i64,
}

impl Loan {
    pub fn state(&self) -> LoanState {
        match self.return_date {
            None => LoanState::Open,
            Some(_) => LoanState::Closed,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == LoanState::Open
    }
}

/// One line of a customer's loan list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CustomerLoan {
    pub transaction_id: i64,
    pub book_id: i64,
    pub title: String,
    pub checkout_date: NaiveDateTime,
    pub due_date: NaiveDateTime,
    pub return_date: Option<NaiveDateTime>,
    pub fine: i64,
}

/// Loan joined with book title and customer name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LoanDetail {
    pub transaction_id: i64,
    pub title: String,
    pub customer_name: String,
    pub checkout_date: NaiveDateTime,
    pub due_date: NaiveDateTime,
    pub return_date: Option<NaiveDateTime>,
    pub fine: i64,
}

// ============================================================================
// REPORT ROWS
// ============================================================================

/// Overdue report line; `fine` is the stored value, not a live estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OverdueEntry {
    pub transaction_id: i64,
    pub title: String,
    pub customer_name: String,
    pub due_date: NaiveDateTime,
    pub fine: i64,
}

/// Transaction history report line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    pub transaction_id: i64,
    pub title: String,
    pub customer_name: String,
    pub checkout_date: NaiveDateTime,
    pub return_date: Option<NaiveDateTime>,
}
