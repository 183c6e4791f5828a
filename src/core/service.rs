//! Storage traits the services are written against
//!
//! Implementations own the SQL (or in-memory equivalent); services own the
//! workflow around it. Both PostgreSQL and in-memory backends implement
//! every trait here.

use crate::entities::{Customer, Invoice, InvoiceDraft, NewInvoice, Revenue, User};
use crate::storage::StorageError;
use async_trait::async_trait;
use std::fmt;

/// Persistence for invoice mutations and the listing view
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert one invoice and return its generated id
    async fn insert(&self, invoice: &NewInvoice) -> Result<String, StorageError>;

    /// Set customer, amount and status on the invoice with `id`
    ///
    /// The date is left untouched. Updating an unknown id affects no rows
    /// and is not an error.
    async fn update(&self, id: &str, draft: &InvoiceDraft) -> Result<(), StorageError>;

    /// Delete the invoice with `id`; unknown ids are a no-op
    async fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// All invoices, newest first
    async fn list(&self) -> Result<Vec<Invoice>, StorageError>;
}

/// User lookup for credential sign-in
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;
}

/// One of the four seedable tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedTable {
    Users,
    Customers,
    Invoices,
    Revenue,
}

impl SeedTable {
    pub const ALL: [SeedTable; 4] = [
        SeedTable::Users,
        SeedTable::Customers,
        SeedTable::Invoices,
        SeedTable::Revenue,
    ];

    /// Case-insensitive table lookup
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "users" => Some(SeedTable::Users),
            "customers" => Some(SeedTable::Customers),
            "invoices" => Some(SeedTable::Invoices),
            "revenue" => Some(SeedTable::Revenue),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeedTable::Users => "users",
            SeedTable::Customers => "customers",
            SeedTable::Invoices => "invoices",
            SeedTable::Revenue => "revenue",
        }
    }

    /// Capitalized name for log lines and response messages
    pub fn label(&self) -> &'static str {
        match self {
            SeedTable::Users => "Users",
            SeedTable::Customers => "Customers",
            SeedTable::Invoices => "Invoices",
            SeedTable::Revenue => "Revenue",
        }
    }
}

impl fmt::Display for SeedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rows for a single table, ready to insert
///
/// User passwords are already hashed.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedBatch {
    Users(Vec<User>),
    Customers(Vec<Customer>),
    Invoices(Vec<NewInvoice>),
    Revenue(Vec<Revenue>),
}

impl SeedBatch {
    pub fn table(&self) -> SeedTable {
        match self {
            SeedBatch::Users(_) => SeedTable::Users,
            SeedBatch::Customers(_) => SeedTable::Customers,
            SeedBatch::Invoices(_) => SeedTable::Invoices,
            SeedBatch::Revenue(_) => SeedTable::Revenue,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SeedBatch::Users(rows) => rows.len(),
            SeedBatch::Customers(rows) => rows.len(),
            SeedBatch::Invoices(rows) => rows.len(),
            SeedBatch::Revenue(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What seeding did to one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub table: SeedTable,
    /// Rows found before clearing
    pub existing: u64,
    /// Rows actually written (conflicting keys are skipped)
    pub inserted: u64,
}

/// Table (re)creation and bulk loading
#[async_trait]
pub trait SeedStore: Send + Sync {
    /// Reseed every batch's table inside a single transaction
    ///
    /// For each batch, in order: create the table if absent, count its
    /// rows, delete them all when there are any, then bulk insert the batch
    /// with a conflict guard on the key column. Any failure rolls back every
    /// table in the call.
    async fn reseed(&self, batches: &[SeedBatch]) -> Result<Vec<SeedReport>, StorageError>;
}
