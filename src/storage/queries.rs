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

//! Database query functions
//!
//! One function per SQL statement. Every function is generic over the
//! executor so the same statement runs against the pool or inside a
//! transaction (`&mut *tx`).
//!
//! # Query Patterns
//! - Parameterized statements only, never string-built SQL
//! - Writes return the inserted rowid or the number of affected rows;
//!   callers decide whether zero rows is an error

use crate::error::Result;
use crate::storage::models::*;
use chrono::NaiveDateTime;
use sqlx::{Executor, Sqlite};

// ============================================================================
// BOOK QUERIES
// ============================================================================

/// Insert a new book
///
/// Returns the book_id of the inserted book.
pub async fn insert_book<'e, E>(executor: E, book: &NewBook) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO books (title, author, genre, isbn)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.genre)
    .bind(&book.isbn)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Find book by ID
pub async fn find_book_by_id<'e, E>(executor: E, book_id: i64) -> Result<Option<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let book = sqlx::query_as::<_, Book>(
        "SELECT book_id, title, author, genre, isbn, is_available FROM books WHERE book_id = ?",
    )
    .bind(book_id)
    .fetch_optional(executor)
    .await?;

    Ok(book)
}

/// Replace every mutable column of a book
pub async fn update_book<'e, E>(executor: E, book: &Book) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        UPDATE books SET
            title = ?, author = ?, genre = ?, isbn = ?, is_available = ?
        WHERE book_id = ?
        "#,
    )
    .bind(&book.title)
    .bind(&book.author)
    .bind(&book.genre)
    .bind(&book.isbn)
    .bind(book.is_available)
    .bind(book.book_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Delete a book
pub async fn delete_book<'e, E>(executor: E, book_id: i64) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM books WHERE book_id = ?")
        .bind(book_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Set the availability flag of a book
pub async fn set_book_availability<'e, E>(executor: E, book_id: i64, available: bool) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE books SET is_available = ? WHERE book_id = ?")
        .bind(available)
        .bind(book_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// Search books by title, author, genre or ISBN
///
/// Title, author and genre match case-insensitively with Unicode case
/// folding; ISBN matches as a case-sensitive substring. An empty term
/// matches every book. SQLite's `lower()` only folds ASCII, so the match
/// runs on the fetched rows.
pub async fn search_books<'e, E>(executor: E, term: &str) -> Result<Vec<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as::<_, Book>(
        r#"
        SELECT book_id, title, author, genre, isbn, is_available
        FROM books
        ORDER BY book_id
        "#,
    )
    .fetch_all(executor)
    .await?;

    if term.is_empty() {
        return Ok(books);
    }

    let needle = term.to_lowercase();
    Ok(books
        .into_iter()
        .filter(|book| book.matches(term, &needle))
        .collect())
}

// ============================================================================
// CUSTOMER QUERIES
// ============================================================================

/// Insert a new customer
///
/// Returns the customer_id of the inserted customer.
pub async fn insert_customer<'e, E>(executor: E, customer: &NewCustomer) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO customers (name, email, membership_status) VALUES (?, ?, ?)",
    )
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.membership_status)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Find customer by ID
pub async fn find_customer_by_id<'e, E>(executor: E, customer_id: i64) -> Result<Option<Customer>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let customer = sqlx::query_as::<_, Customer>(
        "SELECT customer_id, name, email, membership_status FROM customers WHERE customer_id = ?",
    )
    .bind(customer_id)
    .fetch_optional(executor)
    .await?;

    Ok(customer)
}

/// Replace every mutable column of a customer
pub async fn update_customer<'e, E>(executor: E, customer: &Customer) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE customers SET name = ?, email = ?, membership_status = ? WHERE customer_id = ?",
    )
    .bind(&customer.name)
    .bind(&customer.email)
    .bind(&customer.membership_status)
    .bind(customer.customer_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Delete a customer
pub async fn delete_customer<'e, E>(executor: E, customer_id: i64) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM customers WHERE customer_id = ?")
        .bind(customer_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

/// List all customers in id order
pub async fn list_customers<'e, E>(executor: E) -> Result<Vec<Customer>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let customers = sqlx::query_as::<_, Customer>(
        "SELECT customer_id, name, email, membership_status FROM customers ORDER BY customer_id",
    )
    .fetch_all(executor)
    .await?;

    Ok(customers)
}

// ============================================================================
// LOAN QUERIES
// ============================================================================

/// Insert an open loan
///
/// Returns the transaction_id of the new loan.
pub async fn insert_loan<'e, E>(
    executor: E,
    book_id: i64,
    customer_id: i64,
    checkout_date: NaiveDateTime,
    due_date: NaiveDateTime,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO transactions (book_id, customer_id, checkout_date, due_date)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(book_id)
    .bind(customer_id)
    .bind(checkout_date)
    .bind(due_date)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Find loan by ID
pub async fn find_loan_by_id<'e, E>(executor: E, transaction_id: i64) -> Result<Option<Loan>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let loan = sqlx::query_as::<_, Loan>(
        r#"
        SELECT transaction_id, book_id, customer_id, checkout_date, due_date, return_date, fine
        FROM transactions
        WHERE transaction_id = ?
        "#,
    )
    .bind(transaction_id)
    .fetch_optional(executor)
    .await?;

    Ok(loan)
}

/// Stamp the return date and the fine of a loan
pub async fn record_return<'e, E>(
    executor: E,
    transaction_id: i64,
    return_date: NaiveDateTime,
    fine: i64,
) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "UPDATE transactions SET return_date = ?, fine = ? WHERE transaction_id = ?",
    )
    .bind(return_date)
    .bind(fine)
    .bind(transaction_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Number of loans on a book that have no return date
pub async fn count_open_loans_for_book<'e, E>(executor: E, book_id: i64) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM transactions WHERE book_id = ? AND return_date IS NULL",
    )
    .bind(book_id)
    .fetch_one(executor)
    .await?;

    Ok(count)
}

/// All loans of one customer with the book title, in insertion order
pub async fn list_loans_by_customer<'e, E>(executor: E, customer_id: i64) -> Result<Vec<CustomerLoan>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let loans = sqlx::query_as::<_, CustomerLoan>(
        r#"
        SELECT t.transaction_id, t.book_id, b.title, t.checkout_date, t.due_date,
               t.return_date, t.fine
        FROM transactions t
        JOIN books b ON t.book_id = b.book_id
        WHERE t.customer_id = ?
        ORDER BY t.transaction_id
        "#,
    )
    .bind(customer_id)
    .fetch_all(executor)
    .await?;

    Ok(loans)
}

/// Every loan with book title and customer name, in insertion order
pub async fn list_loan_details<'e, E>(executor: E) -> Result<Vec<LoanDetail>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let loans = sqlx::query_as::<_, LoanDetail>(
        r#"
        SELECT t.transaction_id, b.title, c.name AS customer_name, t.checkout_date,
               t.due_date, t.return_date, t.fine
        FROM transactions t
        JOIN books b ON t.book_id = b.book_id
        JOIN customers c ON t.customer_id = c.customer_id
        ORDER BY t.transaction_id
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(loans)
}

// ============================================================================
// REPORT QUERIES
// ============================================================================

/// Open loans whose due date is strictly before `now`
pub async fn list_overdue<'e, E>(executor: E, now: NaiveDateTime) -> Result<Vec<OverdueEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, OverdueEntry>(
        r#"
        SELECT t.transaction_id, b.title, c.name AS customer_name, t.due_date, t.fine
        FROM transactions t
        JOIN books b ON t.book_id = b.book_id
        JOIN customers c ON t.customer_id = c.customer_id
        WHERE t.return_date IS NULL AND t.due_date < ?
        ORDER BY t.due_date, t.transaction_id
        "#,
    )
    .bind(now)
    .fetch_all(executor)
    .await?;

    Ok(rows)
}

/// Loans checked out between `from` and `to`, both bounds inclusive
pub async fn list_history<'e, E>(
    executor: E,
    from: NaiveDateTime,
    to: NaiveDateTime,
) -> Result<Vec<HistoryEntry>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, HistoryEntry>(
        r#"
        SELECT t.transaction_id, b.title, c.name AS customer_name, t.checkout_date,
               t.return_date
        FROM transactions t
        JOIN books b ON t.book_id = b.book_id
        JOIN customers c ON t.customer_id = c.customer_id
        WHERE t.checkout_date BETWEEN ? AND ?
        ORDER BY t.checkout_date, t.transaction_id
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(executor)
    .await?;

    Ok(rows)
}
