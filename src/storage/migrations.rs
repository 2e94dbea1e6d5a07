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

//! Database migrations
//!
//! Creates the three library tables. Identifiers are assigned by SQLite
//! (`AUTOINCREMENT`), never supplied by the client. Migrations run as
//! runtime SQL and are tracked in `_migrations`.

use crate::error::Result;
use sqlx::{Executor, SqlitePool};
use tracing::info;

/// Run all database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    create_migrations_table(pool).await?;

    run_migration(pool, 1, "initial_schema", create_initial_schema(pool)).await?;
    run_migration(pool, 2, "loan_indexes", create_loan_indexes(pool)).await?;

    Ok(())
}

/// Create migrations tracking table
async fn create_migrations_table(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .await?;

    Ok(())
}

/// Run a single migration if it hasn't been applied yet
async fn run_migration(
    pool: &SqlitePool,
    id: i32,
    name: &str,
    migration_fn: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    let applied: Option<i32> = sqlx::query_scalar("SELECT id FROM _migrations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    if applied.is_some() {
        return Ok(());
    }

    migration_fn.await?;

    sqlx::query("INSERT INTO _migrations (id, name) VALUES (?, ?)")
        .bind(id)
        .bind(name)
        .execute(pool)
        .await?;

    info!(id, name, "Applied migration");
    Ok(())
}

/// Create initial database schema
async fn create_initial_schema(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
-- Books table: catalog entries
CREATE TABLE IF NOT EXISTS books (
    book_id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    author TEXT NOT NULL,
    genre TEXT NOT NULL,
    isbn TEXT NOT NULL,  -- 13 characters, not unique
    is_available INTEGER NOT NULL DEFAULT 1  -- 0 while an open loan exists
);

-- Customers table: library members
CREATE TABLE IF NOT EXISTS customers (
    customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    membership_status TEXT NOT NULL  -- Active, Inactive, Suspended
);

-- Transactions table: one row per loan
CREATE TABLE IF NOT EXISTS transactions (
    transaction_id INTEGER PRIMARY KEY AUTOINCREMENT,
    book_id INTEGER NOT NULL,
    customer_id INTEGER NOT NULL,
    checkout_date TEXT NOT NULL,  -- YYYY-MM-DD HH:MM:SS, local time
    return_date TEXT,             -- NULL while the loan is open
    due_date TEXT NOT NULL,
    fine INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (book_id) REFERENCES books(book_id),
    FOREIGN KEY (customer_id) REFERENCES customers(customer_id)
);
        "#,
    )
    .await?;

    Ok(())
}

/// Indexes for the per-book and per-customer loan lookups
async fn create_loan_indexes(pool: &SqlitePool) -> Result<()> {
    pool.execute(
        r#"
CREATE INDEX IF NOT EXISTS idx_transactions_book ON transactions(book_id);
CREATE INDEX IF NOT EXISTS idx_transactions_customer ON transactions(customer_id);
CREATE INDEX IF NOT EXISTS idx_transactions_open ON transactions(return_date, due_date);
        "#,
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn test_migrations_are_recorded_once() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open database");

        run_migrations(&pool).await.expect("First run failed");
        run_migrations(&pool).await.expect("Second run failed");

        let names: Vec<String> = sqlx::query_scalar("SELECT name FROM _migrations ORDER BY id")
            .fetch_all(&pool)
            .await
            .expect("Failed to read migrations");
        assert_eq!(names, vec!["initial_schema", "loan_indexes"]);
    }

    #[tokio::test]
    async fn test_book_defaults() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open database");
        run_migrations(&pool).await.expect("Migrations failed");

        sqlx::query("INSERT INTO books (title, author, genre, isbn) VALUES ('T', 'A', 'G', '9780000000001')")
            .execute(&pool)
            .await
            .expect("Insert failed");

        let (id, available): (i64, bool) =
            sqlx::query_as("SELECT book_id, is_available FROM books")
                .fetch_one(&pool)
                .await
                .expect("Select failed");
        assert_eq!(id, 1);
        assert!(available);
    }
}
