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

//! Catalog store: books
//!
//! Full-replace CRUD plus substring search. Loans are not consulted here;
//! deleting a book that still has loan rows is refused by the foreign key
//! and surfaces as a persistence error.

use crate::error::{LibraryError, Result};
use crate::storage::models::{Book, NewBook};
use crate::storage::{queries, Database};
use tracing::{debug, error, info};

#[derive(Debug, Clone)]
pub struct CatalogStore {
    db: Database,
}

impl CatalogStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Add a book; it starts out available
    ///
    /// Returns the new book_id.
    pub async fn add_book(&self, book: &NewBook) -> Result<i64> {
        let book_id = queries::insert_book(self.db.pool(), book)
            .await
            .inspect_err(|e| error!(error = %e, title = %book.title, "Error adding book"))?;

        info!(book_id, title = %book.title, "Book added");
        Ok(book_id)
    }

    /// Replace title, author, genre, ISBN and availability of a book
    pub async fn update_book(&self, book: &Book) -> Result<()> {
        let affected = queries::update_book(self.db.pool(), book)
            .await
            .inspect_err(|e| error!(error = %e, book_id = book.book_id, "Error updating book"))?;

        if affected == 0 {
            return Err(LibraryError::not_found(format!("book {}", book.book_id)));
        }

        info!(book_id = book.book_id, "Book updated");
        Ok(())
    }

    pub async fn delete_book(&self, book_id: i64) -> Result<()> {
        let affected = queries::delete_book(self.db.pool(), book_id)
            .await
            .inspect_err(|e| error!(error = %e, book_id, "Error deleting book"))?;

        if affected == 0 {
            return Err(LibraryError::not_found(format!("book {}", book_id)));
        }

        info!(book_id, "Book deleted");
        Ok(())
    }

    /// Search by title, author, genre (any case) or ISBN (exact case)
    ///
    /// An empty term lists the whole catalog.
    pub async fn search_books(&self, term: &str) -> Result<Vec<Book>> {
        let books = queries::search_books(self.db.pool(), term)
            .await
            .inspect_err(|e| error!(error = %e, term, "Error searching books"))?;

        debug!(term, hits = books.len(), "Book search");
        Ok(books)
    }

    pub async fn find_book(&self, book_id: i64) -> Result<Option<Book>> {
        queries::find_book_by_id(self.db.pool(), book_id)
            .await
            .inspect_err(|e| error!(error = %e, book_id, "Error fetching book"))
    }
}
