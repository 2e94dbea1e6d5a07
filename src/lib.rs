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

//! Library Desk: books, customers, loans and reports over SQLite
//!
//! [`Library`] opens the database and hands out the four components, all
//! sharing one [`storage::Database`] handle:
//! - [`catalog::CatalogStore`] for books
//! - [`members::MemberStore`] for customers
//! - [`ledger::Ledger`] for checkouts, returns and fines
//! - [`reports::ReportView`] for the overdue and history reports

pub mod catalog;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod members;
pub mod reports;
pub mod storage;
pub mod validation;

pub use catalog::CatalogStore;
pub use config::LibraryConfig;
pub use error::{LibraryError, Result};
pub use ledger::Ledger;
pub use members::MemberStore;
pub use reports::ReportView;
pub use storage::Database;

use std::path::Path;

/// Open library: one database handle shared by every component
#[derive(Debug, Clone)]
pub struct Library {
    db: Database,
    catalog: CatalogStore,
    members: MemberStore,
    ledger: Ledger,
    reports: ReportView,
}

impl Library {
    /// Open the database named by the configuration
    pub async fn open(config: &LibraryConfig) -> Result<Self> {
        Self::open_path(&config.database_path).await
    }

    pub async fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::with_database(Database::new(path).await?))
    }

    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self::with_database(Database::new_in_memory().await?))
    }

    pub fn with_database(db: Database) -> Self {
        Self {
            catalog: CatalogStore::new(db.clone()),
            members: MemberStore::new(db.clone()),
            ledger: Ledger::new(db.clone()),
            reports: ReportView::new(db.clone()),
            db,
        }
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn members(&self) -> &MemberStore {
        &self.members
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn reports(&self) -> &ReportView {
        &self.reports
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Close the shared connection
    pub async fn close(self) -> Result<()> {
        let Self { db, .. } = self;
        db.close().await
    }
}
