//! Database seeding
//!
//! Rebuilds the users, customers, invoices and revenue tables from the
//! fixtures in [`fixtures`]. Each run is destructive: existing rows are
//! deleted, then the fixture rows inserted. Runs are single-flight within
//! the process and atomic per call.

pub mod fixtures;

use crate::auth::credentials::{HASH_COST, hash_password};
use crate::core::error::{DashboardError, SeedError};
use crate::core::service::{SeedBatch, SeedStore, SeedTable};
use crate::entities::{Customer, InvoiceStatus, NewInvoice, Revenue, User};
use chrono::NaiveDate;
use fixtures::{CUSTOMERS, INVOICES, REVENUE, USERS};
use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Message returned after seeding every table
pub const ALL_TABLES_MESSAGE: &str = "Database seeded successfully";

/// Which tables a seed request covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedSelection {
    All,
    Table(SeedTable),
}

impl SeedSelection {
    /// Interpret the optional `table` query parameter; empty means all
    pub fn from_query(table: Option<&str>) -> Result<Self, SeedError> {
        match table {
            None | Some("") => Ok(SeedSelection::All),
            Some(name) => SeedTable::parse(name)
                .map(SeedSelection::Table)
                .ok_or_else(|| SeedError::InvalidTable {
                    table: name.to_string(),
                }),
        }
    }

    pub fn tables(&self) -> Vec<SeedTable> {
        match self {
            SeedSelection::All => SeedTable::ALL.to_vec(),
            SeedSelection::Table(table) => vec![*table],
        }
    }

    /// Success message for the response body
    pub fn success_message(&self) -> String {
        match self {
            SeedSelection::All => ALL_TABLES_MESSAGE.to_string(),
            SeedSelection::Table(table) => format!("{} table seeded successfully", table.label()),
        }
    }
}

/// Runs seed requests against a [`SeedStore`]
#[derive(Clone)]
pub struct Seeder {
    store: Arc<dyn SeedStore>,
    running: Arc<Mutex<()>>,
    hash_cost: u32,
}

impl Seeder {
    pub fn new(store: Arc<dyn SeedStore>) -> Self {
        Self {
            store,
            running: Arc::new(Mutex::new(())),
            hash_cost: HASH_COST,
        }
    }

    /// Override the bcrypt cost (tests use the minimum)
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Seed the selected tables and return the success message
    pub async fn seed(&self, selection: SeedSelection) -> Result<String, DashboardError> {
        let tables = selection.tables();
        tracing::info!(?tables, "seeding started");

        let batches = try_join_all(tables.iter().map(|table| self.batch(*table)))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "preparing seed data failed");
                SeedError::Failed {
                    message: e.to_string(),
                }
            })?;

        let _running = self.running.lock().await;
        let reports = self.store.reseed(&batches).await.map_err(|e| {
            tracing::error!(error = %e, "seeding failed, rolled back");
            SeedError::Failed {
                message: e.to_string(),
            }
        })?;

        for report in &reports {
            tracing::info!(
                table = report.table.label(),
                existing = report.existing,
                inserted = report.inserted,
                "table seeded"
            );
        }

        Ok(selection.success_message())
    }

    /// Build the rows for one table
    async fn batch(&self, table: SeedTable) -> anyhow::Result<SeedBatch> {
        match table {
            SeedTable::Users => Ok(SeedBatch::Users(self.hashed_users().await?)),
            SeedTable::Customers => Ok(SeedBatch::Customers(customers())),
            SeedTable::Invoices => Ok(SeedBatch::Invoices(invoices()?)),
            SeedTable::Revenue => Ok(SeedBatch::Revenue(revenue())),
        }
    }

    /// Fixture users with every password hashed concurrently
    async fn hashed_users(&self) -> anyhow::Result<Vec<User>> {
        let cost = self.hash_cost;
        try_join_all(USERS.iter().map(|fixture| async move {
            Ok::<_, anyhow::Error>(User {
                id: fixture.id,
                name: fixture.name.to_string(),
                email: fixture.email.to_string(),
                password: hash_password(fixture.password.to_string(), cost).await?,
            })
        }))
        .await
    }
}

fn customers() -> Vec<Customer> {
    CUSTOMERS
        .iter()
        .map(|c| Customer {
            id: c.id,
            name: c.name.to_string(),
            email: c.email.to_string(),
            image_url: c.image_url.to_string(),
        })
        .collect()
}

fn invoices() -> anyhow::Result<Vec<NewInvoice>> {
    INVOICES
        .iter()
        .map(|i| -> anyhow::Result<NewInvoice> {
            Ok(NewInvoice {
                customer_id: i.customer_id.to_string(),
                amount: i.amount,
                status: i.status.parse::<InvoiceStatus>().map_err(anyhow::Error::msg)?,
                date: NaiveDate::parse_from_str(i.date, "%Y-%m-%d")?,
            })
        })
        .collect()
}

fn revenue() -> Vec<Revenue> {
    REVENUE
        .iter()
        .map(|r| Revenue {
            month: r.month.to_string(),
            revenue: r.revenue,
        })
        .collect()
}
