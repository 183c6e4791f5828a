//! In-memory storage for testing and development
//!
//! Mirrors the PostgreSQL backend's observable behavior: tables only accept
//! rows once created, seeding is all-or-nothing per call, and conflicting
//! keys are skipped on insert. Individual operations can be made to fail to
//! exercise error paths.

use crate::core::service::{InvoiceStore, SeedBatch, SeedReport, SeedStore, SeedTable, UserStore};
use crate::entities::{Customer, Invoice, InvoiceDraft, NewInvoice, Revenue, User};
use crate::storage::StorageError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
struct Tables {
    created: HashSet<SeedTable>,
    users: Vec<User>,
    customers: Vec<Customer>,
    invoices: Vec<Invoice>,
    revenue: Vec<Revenue>,
}

impl Tables {
    fn require(&self, table: SeedTable) -> Result<(), StorageError> {
        if self.created.contains(&table) {
            Ok(())
        } else {
            Err(StorageError::backend(
                table.name(),
                format!("relation \"{}\" does not exist", table.name()),
            ))
        }
    }

    fn count(&self, table: SeedTable) -> u64 {
        let n = match table {
            SeedTable::Users => self.users.len(),
            SeedTable::Customers => self.customers.len(),
            SeedTable::Invoices => self.invoices.len(),
            SeedTable::Revenue => self.revenue.len(),
        };
        n as u64
    }

    fn clear(&mut self, table: SeedTable) {
        match table {
            SeedTable::Users => self.users.clear(),
            SeedTable::Customers => self.customers.clear(),
            SeedTable::Invoices => self.invoices.clear(),
            SeedTable::Revenue => self.revenue.clear(),
        }
    }

    fn insert_batch(&mut self, batch: &SeedBatch) -> u64 {
        let mut inserted = 0;
        match batch {
            SeedBatch::Users(rows) => {
                for row in rows {
                    if !self.users.iter().any(|u| u.id == row.id) {
                        self.users.push(row.clone());
                        inserted += 1;
                    }
                }
            }
            SeedBatch::Customers(rows) => {
                for row in rows {
                    if !self.customers.iter().any(|c| c.id == row.id) {
                        self.customers.push(row.clone());
                        inserted += 1;
                    }
                }
            }
            SeedBatch::Invoices(rows) => {
                for row in rows {
                    self.invoices.push(new_row(row));
                    inserted += 1;
                }
            }
            SeedBatch::Revenue(rows) => {
                for row in rows {
                    if !self.revenue.iter().any(|r| r.month == row.month) {
                        self.revenue.push(row.clone());
                        inserted += 1;
                    }
                }
            }
        }
        inserted
    }
}

fn new_row(invoice: &NewInvoice) -> Invoice {
    Invoice {
        id: Uuid::new_v4().to_string(),
        customer_id: invoice.customer_id.clone(),
        amount: invoice.amount,
        status: invoice.status.to_string(),
        date: invoice.date,
    }
}

/// In-memory implementation of every storage trait
///
/// Uses RwLock for thread-safe access. Clones share the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    failing: Arc<RwLock<HashSet<&'static str>>>,
}

impl InMemoryStore {
    /// Create an empty store with no tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose four tables already exist (empty)
    pub fn with_tables() -> Self {
        let store = Self::new();
        if let Ok(mut tables) = store.tables.write() {
            tables.created.extend(SeedTable::ALL);
        }
        store
    }

    /// Make every later call of `operation` fail
    ///
    /// Operation names: `insert`, `update`, `delete`, `list`,
    /// `find_by_email`, `reseed`.
    pub fn fail_on(&self, operation: &'static str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(operation);
        }
    }

    /// Undo [`fail_on`](Self::fail_on)
    pub fn recover(&self, operation: &'static str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.remove(operation);
        }
    }

    /// Add a user row directly, creating the table if needed
    pub fn put_user(&self, user: User) -> Result<(), StorageError> {
        let mut tables = self.write()?;
        tables.created.insert(SeedTable::Users);
        tables.users.push(user);
        Ok(())
    }

    /// Snapshot of invoice rows in insertion order
    pub fn invoices(&self) -> Vec<Invoice> {
        self.read().map(|t| t.invoices.clone()).unwrap_or_default()
    }

    pub fn users(&self) -> Vec<User> {
        self.read().map(|t| t.users.clone()).unwrap_or_default()
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.read().map(|t| t.customers.clone()).unwrap_or_default()
    }

    pub fn revenue(&self) -> Vec<Revenue> {
        self.read().map(|t| t.revenue.clone()).unwrap_or_default()
    }

    pub fn table_exists(&self, table: SeedTable) -> bool {
        self.read()
            .map(|t| t.created.contains(&table))
            .unwrap_or(false)
    }

    fn check(&self, operation: &'static str) -> Result<(), StorageError> {
        let failing = self
            .failing
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        if failing.contains(operation) {
            return Err(StorageError::backend(operation, "injected failure"));
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables
            .read()
            .map_err(|e| StorageError::Lock(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables
            .write()
            .map_err(|e| StorageError::Lock(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl InvoiceStore for InMemoryStore {
    async fn insert(&self, invoice: &NewInvoice) -> Result<String, StorageError> {
        self.check("insert")?;
        let mut tables = self.write()?;
        tables.require(SeedTable::Invoices)?;

        let row = new_row(invoice);
        let id = row.id.clone();
        tables.invoices.push(row);
        Ok(id)
    }

    async fn update(&self, id: &str, draft: &InvoiceDraft) -> Result<(), StorageError> {
        self.check("update")?;
        let mut tables = self.write()?;
        tables.require(SeedTable::Invoices)?;

        if let Some(row) = tables.invoices.iter_mut().find(|i| i.id == id) {
            row.customer_id = draft.customer_id.clone();
            row.amount = draft.amount_in_cents;
            row.status = draft.status.to_string();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.check("delete")?;
        let mut tables = self.write()?;
        tables.require(SeedTable::Invoices)?;

        tables.invoices.retain(|i| i.id != id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Invoice>, StorageError> {
        self.check("list")?;
        let tables = self.read()?;
        tables.require(SeedTable::Invoices)?;

        let mut invoices = tables.invoices.clone();
        invoices.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(invoices)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        self.check("find_by_email")?;
        let tables = self.read()?;
        tables.require(SeedTable::Users)?;

        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl SeedStore for InMemoryStore {
    async fn reseed(&self, batches: &[SeedBatch]) -> Result<Vec<SeedReport>, StorageError> {
        self.check("reseed")?;
        let mut tables = self.write()?;

        // Work on a copy so a failure leaves nothing behind.
        let mut staged = tables.clone();
        let mut reports = Vec::with_capacity(batches.len());
        for batch in batches {
            let table = batch.table();
            staged.created.insert(table);

            let existing = staged.count(table);
            if existing > 0 {
                staged.clear(table);
            }
            let inserted = staged.insert_batch(batch);

            reports.push(SeedReport {
                table,
                existing,
                inserted,
            });
        }

        *tables = staged;
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::InvoiceStatus;
    use chrono::NaiveDate;

    fn new_invoice(amount: i64) -> NewInvoice {
        NewInvoice {
            customer_id: "c1".into(),
            amount,
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_requires_table() {
        let store = InMemoryStore::new();
        assert!(store.insert(&new_invoice(100)).await.is_err());

        let store = InMemoryStore::with_tables();
        let id = store.insert(&new_invoice(100)).await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(store.invoices().len(), 1);
    }

    #[tokio::test]
    async fn test_update_leaves_date_untouched() {
        let store = InMemoryStore::with_tables();
        let id = store.insert(&new_invoice(100)).await.unwrap();

        let draft = InvoiceDraft {
            customer_id: "c2".into(),
            amount_in_cents: 250,
            status: InvoiceStatus::Paid,
        };
        store.update(&id, &draft).await.unwrap();

        let row = &store.invoices()[0];
        assert_eq!(row.customer_id, "c2");
        assert_eq!(row.amount, 250);
        assert_eq!(row.status, "paid");
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let store = InMemoryStore::with_tables();
        store.insert(&new_invoice(100)).await.unwrap();
        store.delete("missing").await.unwrap();
        assert_eq!(store.invoices().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = InMemoryStore::with_tables();
        store.fail_on("insert");
        assert!(store.insert(&new_invoice(1)).await.is_err());
        store.recover("insert");
        assert!(store.insert(&new_invoice(1)).await.is_ok());
    }

    #[tokio::test]
    async fn test_reseed_replaces_rows_and_skips_conflicts() {
        let store = InMemoryStore::new();
        let revenue = |m: &str| Revenue {
            month: m.into(),
            revenue: 1,
        };
        let batch = SeedBatch::Revenue(vec![revenue("Jan"), revenue("Jan"), revenue("Feb")]);

        let first = store.reseed(std::slice::from_ref(&batch)).await.unwrap();
        assert_eq!(first[0].existing, 0);
        assert_eq!(first[0].inserted, 2);

        let second = store.reseed(&[batch]).await.unwrap();
        assert_eq!(second[0].existing, 2);
        assert_eq!(store.revenue().len(), 2);
    }
}
