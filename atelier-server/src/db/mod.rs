//! redb-based key-value storage layer
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `customers` | `customer_id` | `Customer` | Customer registry |
//! | `reservations` | `reservation_id` | `Reservation` | Reservation store |
//! | `incentives` | `(staff, date)` | `IncentiveEntry` | Derived incentive ledger |
//! | `staff` | `username` | `StaffAccount` | Identity store |
//! | `locations` | `location_id` | `Location` | Location master data |
//!
//! Values are JSON-serialized. redb commits are durable as soon as
//! `commit()` returns, and write transactions are serialized, which gives
//! the per-key atomicity the incentive ledger requires: two concurrent
//! adjustments of the same (staff, date) key can never interleave their
//! read-modify-write.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::AppError;
use shared::models::{Customer, IncentiveEntry, Location, Reservation, StaffAccount};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const CUSTOMERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("customers");
const RESERVATIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("reservations");
const INCENTIVES_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("incentives");
const STAFF_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("staff");
const LOCATIONS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("locations");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::database(err.to_string())
    }
}

/// Embedded key-value storage backed by redb
#[derive(Clone)]
pub struct StudioStorage {
    db: Arc<Database>,
}

impl StudioStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (tests, ephemeral runs)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(CUSTOMERS_TABLE)?;
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(INCENTIVES_TABLE)?;
            let _ = write_txn.open_table(STAFF_TABLE)?;
            let _ = write_txn.open_table(LOCATIONS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Generic helpers ==========

    fn put<T: Serialize>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
        value: &T,
    ) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut t = txn.open_table(table)?;
            let bytes = serde_json::to_vec(value)?;
            t.insert(key, bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        match t.get(key)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn remove(&self, table: TableDefinition<&str, &[u8]>, key: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut t = txn.open_table(table)?;
            t.remove(key)?.is_some()
        };
        txn.commit()?;
        Ok(existed)
    }

    fn list<T: DeserializeOwned>(
        &self,
        table: TableDefinition<&str, &[u8]>,
    ) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        let mut items = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok(items)
    }

    // ========== Customers ==========

    pub fn put_customer(&self, customer: &Customer) -> StorageResult<()> {
        self.put(CUSTOMERS_TABLE, &customer.customer_id, customer)
    }

    pub fn get_customer(&self, customer_id: &str) -> StorageResult<Option<Customer>> {
        self.get(CUSTOMERS_TABLE, customer_id)
    }

    pub fn remove_customer(&self, customer_id: &str) -> StorageResult<bool> {
        self.remove(CUSTOMERS_TABLE, customer_id)
    }

    pub fn list_customers(&self) -> StorageResult<Vec<Customer>> {
        self.list(CUSTOMERS_TABLE)
    }

    // ========== Reservations ==========

    pub fn put_reservation(&self, reservation: &Reservation) -> StorageResult<()> {
        self.put(RESERVATIONS_TABLE, &reservation.id, reservation)
    }

    pub fn get_reservation(&self, id: &str) -> StorageResult<Option<Reservation>> {
        self.get(RESERVATIONS_TABLE, id)
    }

    pub fn remove_reservation(&self, id: &str) -> StorageResult<bool> {
        self.remove(RESERVATIONS_TABLE, id)
    }

    pub fn list_reservations(&self) -> StorageResult<Vec<Reservation>> {
        self.list(RESERVATIONS_TABLE)
    }

    // ========== Staff ==========

    pub fn put_staff(&self, account: &StaffAccount) -> StorageResult<()> {
        self.put(STAFF_TABLE, &account.username, account)
    }

    pub fn get_staff(&self, username: &str) -> StorageResult<Option<StaffAccount>> {
        self.get(STAFF_TABLE, username)
    }

    pub fn list_staff(&self) -> StorageResult<Vec<StaffAccount>> {
        self.list(STAFF_TABLE)
    }

    pub fn staff_count(&self) -> StorageResult<u64> {
        use redb::ReadableTableMetadata;
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(STAFF_TABLE)?;
        Ok(t.len()?)
    }

    // ========== Locations ==========

    pub fn put_location(&self, location: &Location) -> StorageResult<()> {
        self.put(LOCATIONS_TABLE, &location.id, location)
    }

    pub fn get_location(&self, id: &str) -> StorageResult<Option<Location>> {
        self.get(LOCATIONS_TABLE, id)
    }

    pub fn remove_location(&self, id: &str) -> StorageResult<bool> {
        self.remove(LOCATIONS_TABLE, id)
    }

    pub fn list_locations(&self) -> StorageResult<Vec<Location>> {
        self.list(LOCATIONS_TABLE)
    }

    // ========== Incentive ledger (low-level) ==========

    pub fn get_incentive(&self, staff: &str, date: &str) -> StorageResult<Option<IncentiveEntry>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(INCENTIVES_TABLE)?;
        match t.get((staff, date))? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn list_incentives(&self) -> StorageResult<Vec<IncentiveEntry>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(INCENTIVES_TABLE)?;
        let mut entries = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            entries.push(serde_json::from_slice(value.value())?);
        }
        Ok(entries)
    }

    /// Apply a count delta to the (staff, date) entry within a transaction.
    ///
    /// Clamps before persisting: a non-positive resulting count deletes the
    /// entry instead of writing it ("entry absent" and "count zero" are
    /// equivalent). Returns the entry as persisted, `None` when deleted.
    pub(crate) fn adjust_incentive_in(
        &self,
        txn: &WriteTransaction,
        staff: &str,
        date: &str,
        delta: i64,
    ) -> StorageResult<Option<IncentiveEntry>> {
        let mut t = txn.open_table(INCENTIVES_TABLE)?;
        let current = match t.get((staff, date))? {
            Some(value) => serde_json::from_slice::<IncentiveEntry>(value.value())?.count,
            None => 0,
        };
        let next = current + delta;
        if next > 0 {
            let entry = IncentiveEntry::new(staff, date, next);
            let bytes = serde_json::to_vec(&entry)?;
            t.insert((staff, date), bytes.as_slice())?;
            Ok(Some(entry))
        } else {
            t.remove((staff, date))?;
            Ok(None)
        }
    }

    /// Drop every ledger entry (precedes a rebuild from the reservation store)
    pub(crate) fn clear_incentives_in(&self, txn: &WriteTransaction) -> StorageResult<()> {
        let mut t = txn.open_table(INCENTIVES_TABLE)?;
        t.retain(|_, _| false)?;
        Ok(())
    }
}
