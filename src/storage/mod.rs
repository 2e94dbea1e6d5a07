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

//! Database storage and models
//!
//! This module handles all database operations using SQLite through sqlx.
//! It is the persistence gateway for the rest of the crate: one owned
//! [`Database`] handle, a migration runner, and one query function per
//! statement.
//!
//! # Database Schema
//! - books: catalog entries with an availability flag
//! - customers: library members
//! - transactions: loans linking a book to a customer
//!
//! # Usage Example
//! ```no_run
//! use library_desk::storage::{Database, queries, models::NewBook};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./library.db").await?;
//!
//! let new_book = NewBook::new("Dune", "Frank Herbert", "Science Fiction", "9780441013593");
//! let book_id = queries::insert_book(db.pool(), &new_book).await?;
//!
//! let book = queries::find_book_by_id(db.pool(), book_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

// Re-export commonly used types
pub use database::Database;
pub use models::{
    Book, Customer, CustomerLoan, HistoryEntry, Loan, LoanDetail, LoanState, MembershipStatus,
    NewBook, NewCustomer, OverdueEntry,
};
