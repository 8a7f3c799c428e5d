//! Customer Registry (顧客台帳)
//!
//! At most one record per `customer_id`. Writes are partial merges: the
//! caller sends only the fields it knows, and absent fields retain their
//! prior values (per-field last-writer-wins). Deleting a customer never
//! cascades to reservations; their `customer_id` simply dangles.

use shared::models::{Customer, CustomerUpsert};
use shared::util::{now_millis, record_id};
use shared::{AppError, AppResult};

use crate::db::StudioStorage;

#[derive(Clone)]
pub struct CustomerRegistry {
    storage: StudioStorage,
}

impl CustomerRegistry {
    pub fn new(storage: StudioStorage) -> Self {
        Self { storage }
    }

    /// Merge a patch into the customer record, creating it when absent.
    ///
    /// `customer_id: None` always creates a fresh record under a generated
    /// id. Returns the record as persisted.
    pub fn upsert(
        &self,
        customer_id: Option<&str>,
        patch: &CustomerUpsert,
    ) -> AppResult<Customer> {
        let mut customer = match customer_id {
            Some(id) => self
                .storage
                .get_customer(id)?
                .unwrap_or_else(|| Customer::empty(id)),
            None => Customer::empty(record_id()),
        };
        patch.apply_to(&mut customer);
        customer.updated_at = now_millis();
        self.storage.put_customer(&customer)?;
        Ok(customer)
    }

    pub fn get(&self, customer_id: &str) -> AppResult<Customer> {
        self.storage
            .get_customer(customer_id)?
            .ok_or_else(|| AppError::customer_not_found(customer_id))
    }

    pub fn find(&self, customer_id: &str) -> AppResult<Option<Customer>> {
        Ok(self.storage.get_customer(customer_id)?)
    }

    /// Remove the record. Reservations referencing it are left untouched.
    pub fn delete(&self, customer_id: &str) -> AppResult<()> {
        if !self.storage.remove_customer(customer_id)? {
            return Err(AppError::customer_not_found(customer_id));
        }
        Ok(())
    }

    /// All customers, newest first
    pub fn list(&self) -> AppResult<Vec<Customer>> {
        let mut customers = self.storage.list_customers()?;
        customers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(customers)
    }

    /// Substring search over name and phone fields
    pub fn search(&self, query: &str) -> AppResult<Vec<Customer>> {
        let mut customers = self.list()?;
        customers.retain(|c| {
            c.parent_name.contains(query)
                || c.child_name.contains(query)
                || c.phone.contains(query)
        });
        Ok(customers)
    }
}
