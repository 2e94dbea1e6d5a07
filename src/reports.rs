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

//! Reporting view
//!
//! Read-only queries over loans joined with books and customers.
//!
//! The overdue report shows the fine as stored. For a loan that is still
//! open the stored fine is 0; nothing recomputes it until the book comes
//! back.

use crate::error::Result;
use crate::ledger::fine;
use crate::storage::models::{HistoryEntry, OverdueEntry};
use crate::storage::{queries, Database};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub struct ReportView {
    db: Database,
}

impl ReportView {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open loans already past their due date
    pub async fn overdue_report(&self) -> Result<Vec<OverdueEntry>> {
        self.overdue_report_at(fine::now()).await
    }

    pub async fn overdue_report_at(&self, now: NaiveDateTime) -> Result<Vec<OverdueEntry>> {
        let rows = queries::list_overdue(self.db.pool(), now)
            .await
            .inspect_err(|e| error!(error = %e, "Error generating overdue report"))?;

        debug!(rows = rows.len(), "Overdue report");
        Ok(rows)
    }

    /// Loans checked out between two calendar dates
    ///
    /// Both bounds are taken at midnight, so a loan checked out during the
    /// day of `end` falls outside the range. A reversed range matches nothing.
    pub async fn transaction_history(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<HistoryEntry>> {
        let from = start.and_time(NaiveTime::MIN);
        let to = end.and_time(NaiveTime::MIN);
        let rows = queries::list_history(self.db.pool(), from, to)
            .await
            .inspect_err(|e| error!(error = %e, "Error generating transaction history"))?;

        debug!(%start, %end, rows = rows.len(), "Transaction history");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::storage::models::{NewBook, NewCustomer};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn at(d: u32, hour: u32) -> NaiveDateTime {
        day(d).and_hms_opt(hour, 0, 0).unwrap()
    }

    async fn setup(books: usize) -> (ReportView, Ledger, Vec<i64>, i64) {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let mut book_ids = Vec::new();
        for i in 0..books {
            let id = queries::insert_book(
                db.pool(),
                &NewBook::new(format!("Book {}", i), "Author", "Genre", format!("978000000000{}", i)),
            )
            .await
            .unwrap();
            book_ids.push(id);
        }
        let customer_id = queries::insert_customer(
            db.pool(),
            &NewCustomer::new("Ada", "ada@example.com", "Active"),
        )
        .await
        .unwrap();

        (ReportView::new(db.clone()), Ledger::new(db), book_ids, customer_id)
    }

    #[tokio::test]
    async fn test_overdue_only_open_and_past_due() {
        let (reports, ledger, books, customer) = setup(3).await;

        // Overdue and open
        let late = ledger.checkout_at(books[0], customer, at(1, 9)).await.unwrap();
        // Returned late: fine set, but closed
        let returned = ledger.checkout_at(books[1], customer, at(1, 9)).await.unwrap();
        ledger.return_book_at(books[1], returned.transaction_id, at(18, 9)).await.unwrap();
        // Open but not yet due
        ledger.checkout_at(books[2], customer, at(10, 9)).await.unwrap();

        let rows = reports.overdue_report_at(at(20, 9)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction_id, late.transaction_id);
        assert_eq!(rows[0].title, "Book 0");
        assert_eq!(rows[0].customer_name, "Ada");
        assert_eq!(rows[0].due_date, at(15, 9));
        assert_eq!(rows[0].fine, 0);
    }

    #[tokio::test]
    async fn test_overdue_requires_strictly_past_due() {
        let (reports, ledger, books, customer) = setup(1).await;
        ledger.checkout_at(books[0], customer, at(1, 9)).await.unwrap();

        assert!(reports.overdue_report_at(at(15, 9)).await.unwrap().is_empty());
        assert_eq!(
            reports
                .overdue_report_at(at(15, 9) + chrono::Duration::seconds(1))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_history_bounds_are_midnight() {
        let (reports, ledger, books, customer) = setup(3).await;
        ledger.checkout_at(books[0], customer, at(2, 0)).await.unwrap();
        ledger.checkout_at(books[1], customer, at(3, 12)).await.unwrap();
        ledger.checkout_at(books[2], customer, at(5, 12)).await.unwrap();

        let rows = reports.transaction_history(day(2), day(5)).await.unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Book 0", "Book 1"]);

        let rows = reports.transaction_history(day(1), day(6)).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.return_date.is_none()));
    }

    #[tokio::test]
    async fn test_history_reversed_range_is_empty() {
        let (reports, ledger, books, customer) = setup(1).await;
        ledger.checkout_at(books[0], customer, at(3, 12)).await.unwrap();

        assert!(reports.transaction_history(day(5), day(2)).await.unwrap().is_empty());
    }
}
