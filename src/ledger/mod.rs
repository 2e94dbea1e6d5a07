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

//! Lending ledger
//!
//! Loans move from Open (no return date) to Closed (return date and fine
//! recorded). Each checkout and each return is a single SQLite transaction
//! covering both the loan row and the book's availability flag, so the
//! flag always mirrors whether the book has an open loan.
//!
//! # Rules
//! - Checkout requires an existing, available book with no open loan and an
//!   existing customer. Otherwise it is a [`LibraryError::Conflict`].
//! - Return requires the loan to exist and to belong to the given book.
//! - Returning a loan that is already Closed is accepted: the return date is
//!   stamped again and the fine recomputed from the new time.
//!
//! The `*_at` variants take the current time explicitly; the plain variants
//! use the local clock.

pub mod fine;

use crate::error::{LibraryError, Result};
use crate::storage::models::{CustomerLoan, Loan, LoanDetail};
use crate::storage::{queries, Database};
use chrono::{NaiveDateTime, SubsecRound};
use tracing::{error, info, warn};

pub use fine::{compute_fine, due_date_for, LOAN_PERIOD_DAYS};

#[derive(Debug, Clone)]
pub struct Ledger {
    db: Database,
}

impl Ledger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Lend a book to a customer for [`LOAN_PERIOD_DAYS`]
    pub async fn checkout(&self, book_id: i64, customer_id: i64) -> Result<Loan> {
        self.checkout_at(book_id, customer_id, fine::now()).await
    }

    pub async fn checkout_at(
        &self,
        book_id: i64,
        customer_id: i64,
        now: NaiveDateTime,
    ) -> Result<Loan> {
        let loan = self
            .open_loan(book_id, customer_id, now.trunc_subsecs(0))
            .await
            .inspect_err(|e| log_failure(e, "checking out book", book_id))?;

        info!(
            transaction_id = loan.transaction_id,
            book_id,
            customer_id,
            due_date = %loan.due_date,
            "Book checked out"
        );
        Ok(loan)
    }

    async fn open_loan(
        &self,
        book_id: i64,
        customer_id: i64,
        checkout_date: NaiveDateTime,
    ) -> Result<Loan> {
        let mut tx = self.db.begin().await?;

        let book = queries::find_book_by_id(&mut *tx, book_id)
            .await?
            .ok_or_else(|| LibraryError::not_found(format!("book {}", book_id)))?;
        // The flag can be edited through the catalog; open loans are authoritative.
        let open_loans = queries::count_open_loans_for_book(&mut *tx, book_id).await?;
        if !book.is_available || open_loans > 0 {
            return Err(LibraryError::conflict(format!(
                "book {} ('{}') is already checked out",
                book_id, book.title
            )));
        }

        queries::find_customer_by_id(&mut *tx, customer_id)
            .await?
            .ok_or_else(|| LibraryError::not_found(format!("customer {}", customer_id)))?;

        let due_date = due_date_for(checkout_date);
        let transaction_id =
            queries::insert_loan(&mut *tx, book_id, customer_id, checkout_date, due_date).await?;
        queries::set_book_availability(&mut *tx, book_id, false).await?;

        tx.commit().await?;

        Ok(Loan {
            transaction_id,
            book_id,
            customer_id,
            checkout_date,
            due_date,
            return_date: None,
            fine: 0,
        })
    }

    /// Record the return of a book and settle its fine
    pub async fn return_book(&self, book_id: i64, transaction_id: i64) -> Result<Loan> {
        self.return_book_at(book_id, transaction_id, fine::now()).await
    }

    pub async fn return_book_at(
        &self,
        book_id: i64,
        transaction_id: i64,
        now: NaiveDateTime,
    ) -> Result<Loan> {
        let loan = self
            .close_loan(book_id, transaction_id, now.trunc_subsecs(0))
            .await
            .inspect_err(|e| log_failure(e, "returning book", book_id))?;

        info!(transaction_id, book_id, fine = loan.fine, "Book returned");
        Ok(loan)
    }

    async fn close_loan(
        &self,
        book_id: i64,
        transaction_id: i64,
        return_date: NaiveDateTime,
    ) -> Result<Loan> {
        let mut tx = self.db.begin().await?;

        let loan = queries::find_loan_by_id(&mut *tx, transaction_id)
            .await?
            .ok_or_else(|| LibraryError::not_found(format!("transaction {}", transaction_id)))?;
        if loan.book_id != book_id {
            return Err(LibraryError::conflict(format!(
                "transaction {} is for book {}, not book {}",
                transaction_id, loan.book_id, book_id
            )));
        }
        if !loan.is_open() {
            warn!(transaction_id, "Loan already returned; stamping the return again");
        }

        let fine = compute_fine(loan.due_date, return_date);
        queries::record_return(&mut *tx, transaction_id, return_date, fine).await?;

        // Another customer may hold the book if this loan was closed before.
        let still_lent = queries::count_open_loans_for_book(&mut *tx, book_id).await? > 0;
        queries::set_book_availability(&mut *tx, book_id, !still_lent).await?;

        tx.commit().await?;

        Ok(Loan {
            return_date: Some(return_date),
            fine,
            ..loan
        })
    }

    /// Loans of one customer with book titles, oldest first
    pub async fn list_by_customer(&self, customer_id: i64) -> Result<Vec<CustomerLoan>> {
        queries::list_loans_by_customer(self.db.pool(), customer_id)
            .await
            .inspect_err(|e| error!(error = %e, customer_id, "Error fetching transactions"))
    }

    /// Every loan with book title and customer name, oldest first
    pub async fn list_all(&self) -> Result<Vec<LoanDetail>> {
        queries::list_loan_details(self.db.pool())
            .await
            .inspect_err(|e| error!(error = %e, "Error fetching transactions"))
    }

    pub async fn find_loan(&self, transaction_id: i64) -> Result<Option<Loan>> {
        queries::find_loan_by_id(self.db.pool(), transaction_id)
            .await
            .inspect_err(|e| error!(error = %e, transaction_id, "Error fetching transaction"))
    }
}

fn log_failure(e: &LibraryError, action: &str, book_id: i64) {
    if e.is_persistence_error() {
        error!(error = %e, book_id, "Error {}", action);
    } else {
        warn!(error = %e, book_id, "Rejected {}", action);
    }
}
