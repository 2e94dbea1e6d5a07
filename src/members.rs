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

//! Member store: customers

use crate::error::{LibraryError, Result};
use crate::storage::models::{Customer, NewCustomer};
use crate::storage::{queries, Database};
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct MemberStore {
    db: Database,
}

impl MemberStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register a customer and return the new customer_id
    pub async fn add_customer(&self, customer: &NewCustomer) -> Result<i64> {
        let customer_id = queries::insert_customer(self.db.pool(), customer)
            .await
            .inspect_err(|e| error!(error = %e, name = %customer.name, "Error adding customer"))?;

        info!(customer_id, name = %customer.name, "Customer added");
        Ok(customer_id)
    }

    /// Replace name, email and membership status of a customer
    pub async fn update_customer(&self, customer: &Customer) -> Result<()> {
        let affected = queries::update_customer(self.db.pool(), customer)
            .await
            .inspect_err(|e| {
                error!(error = %e, customer_id = customer.customer_id, "Error updating customer")
            })?;

        if affected == 0 {
            return Err(LibraryError::not_found(format!(
                "customer {}",
                customer.customer_id
            )));
        }

        info!(customer_id = customer.customer_id, "Customer updated");
        Ok(())
    }

    pub async fn delete_customer(&self, customer_id: i64) -> Result<()> {
        let affected = queries::delete_customer(self.db.pool(), customer_id)
            .await
            .inspect_err(|e| error!(error = %e, customer_id, "Error deleting customer"))?;

        if affected == 0 {
            return Err(LibraryError::not_found(format!("customer {}", customer_id)));
        }

        info!(customer_id, "Customer deleted");
        Ok(())
    }

    pub async fn get_customer(&self, customer_id: i64) -> Result<Option<Customer>> {
        queries::find_customer_by_id(self.db.pool(), customer_id)
            .await
            .inspect_err(|e| error!(error = %e, customer_id, "Error fetching customer"))
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        queries::list_customers(self.db.pool())
            .await
            .inspect_err(|e| error!(error = %e, "Error listing customers"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::MembershipStatus;

    async fn members() -> MemberStore {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        MemberStore::new(db)
    }

    #[tokio::test]
    async fn test_add_and_get_customer() {
        let store = members().await;

        let id = store
            .add_customer(&NewCustomer::new("Ada Lovelace", "ada@example.com", "Active"))
            .await
            .expect("Failed to add customer");

        let customer = store.get_customer(id).await.unwrap().expect("Customer missing");
        assert_eq!(customer.name, "Ada Lovelace");
        assert_eq!(customer.email, "ada@example.com");
        assert_eq!(customer.status(), Some(MembershipStatus::Active));
    }

    #[tokio::test]
    async fn test_get_unknown_customer_is_absent() {
        let store = members().await;
        assert!(store.get_customer(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete_customer() {
        let store = members().await;
        let id = store
            .add_customer(&NewCustomer::new("Grace", "grace@example.com", "Active"))
            .await
            .unwrap();

        let updated = Customer {
            customer_id: id,
            name: "Grace Hopper".into(),
            email: "hopper@example.com".into(),
            membership_status: MembershipStatus::Suspended.to_string(),
        };
        store.update_customer(&updated).await.expect("Update failed");
        assert_eq!(store.get_customer(id).await.unwrap(), Some(updated));

        store.delete_customer(id).await.expect("Delete failed");
        assert!(store.get_customer(id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_customer(id).await,
            Err(LibraryError::RecordNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_customers_in_id_order() {
        let store = members().await;
        for name in ["Carol", "Alice", "Bob"] {
            store
                .add_customer(&NewCustomer::new(name, format!("{}@example.com", name), "Active"))
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list_customers()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
    }
}
