//! PostgreSQL storage backend using sqlx.
//!
//! `PostgresStore` implements every storage trait on top of a shared
//! `sqlx::PgPool`. The pool is built once at startup by [`PostgresStore::connect`]
//! and cloned into each service.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag (on by default).

use crate::config::DatabaseConfig;
use crate::core::service::{InvoiceStore, SeedBatch, SeedReport, SeedStore, SeedTable, UserStore};
use crate::entities::{Invoice, InvoiceDraft, NewInvoice, User};
use crate::storage::StorageError;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use std::str::FromStr;
use std::time::Duration;

/// Advisory lock key held for the duration of a seeding transaction
const SEED_LOCK_KEY: i64 = 0x5EED_1A7E;

fn map_err(operation: &'static str) -> impl FnOnce(sqlx::Error) -> StorageError {
    move |e| StorageError::backend(operation, e)
}

/// Data storage backed by PostgreSQL
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new `PostgresStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build a bounded pool from configuration and connect
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let mut options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if config.require_tls {
            options = options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .connect_with(options)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        tracing::info!(
            max_connections = config.max_connections,
            tls = config.require_tls,
            "connected to PostgreSQL"
        );
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl InvoiceStore for PostgresStore {
    async fn insert(&self, invoice: &NewInvoice) -> Result<String, StorageError> {
        sqlx::query_scalar::<_, String>(
            "INSERT INTO invoices (customer_id, amount, status, date) \
             VALUES ($1::uuid, $2, $3, $4) \
             RETURNING id::text",
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err("insert invoice"))
    }

    async fn update(&self, id: &str, draft: &InvoiceDraft) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE invoices \
             SET customer_id = $1::uuid, amount = $2, status = $3 \
             WHERE id = $4::uuid",
        )
        .bind(&draft.customer_id)
        .bind(draft.amount_in_cents)
        .bind(draft.status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_err("update invoice"))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM invoices WHERE id = $1::uuid")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err("delete invoice"))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Invoice>, StorageError> {
        sqlx::query_as::<_, Invoice>(
            "SELECT id::text AS id, customer_id::text AS customer_id, \
                    amount::int8 AS amount, status, date \
             FROM invoices \
             ORDER BY date DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_err("list invoices"))
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError> {
        sqlx::query_as::<_, User>("SELECT id, name, email, password FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("find user"))
    }
}

#[async_trait]
impl SeedStore for PostgresStore {
    async fn reseed(&self, batches: &[SeedBatch]) -> Result<Vec<SeedReport>, StorageError> {
        let mut tx = self.pool.begin().await.map_err(map_err("begin"))?;

        // Serializes concurrent seed runs across processes.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(map_err("advisory lock"))?;

        let mut reports = Vec::with_capacity(batches.len());
        for batch in batches {
            reports.push(seed_table(&mut *tx, batch).await?);
        }

        tx.commit().await.map_err(map_err("commit"))?;
        Ok(reports)
    }
}

fn create_table_sql(table: SeedTable) -> &'static str {
    match table {
        SeedTable::Users => {
            "CREATE TABLE IF NOT EXISTS users (
                id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL
            )"
        }
        SeedTable::Customers => {
            "CREATE TABLE IF NOT EXISTS customers (
                id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                image_url VARCHAR(255) NOT NULL
            )"
        }
        SeedTable::Invoices => {
            "CREATE TABLE IF NOT EXISTS invoices (
                id UUID DEFAULT gen_random_uuid() PRIMARY KEY,
                customer_id UUID NOT NULL,
                amount INT NOT NULL,
                status VARCHAR(255) NOT NULL,
                date DATE NOT NULL
            )"
        }
        SeedTable::Revenue => {
            "CREATE TABLE IF NOT EXISTS revenue (
                month VARCHAR(4) NOT NULL UNIQUE,
                revenue INT NOT NULL
            )"
        }
    }
}

async fn seed_table(conn: &mut PgConnection, batch: &SeedBatch) -> Result<SeedReport, StorageError> {
    let table = batch.table();
    let label = table.label();

    tracing::debug!(table = label, "creating table if absent");
    sqlx::query(create_table_sql(table))
        .execute(&mut *conn)
        .await
        .map_err(map_err("create table"))?;

    let count_sql = format!("SELECT COUNT(*) FROM {}", table.name());
    let existing: i64 = sqlx::query_scalar(&count_sql)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_err("count rows"))?;
    tracing::info!(table = label, existing, "found existing rows");

    if existing > 0 {
        let delete_sql = format!("DELETE FROM {}", table.name());
        sqlx::query(&delete_sql)
            .execute(&mut *conn)
            .await
            .map_err(map_err("clear table"))?;
        tracing::info!(table = label, "cleared table");
    } else {
        tracing::info!(table = label, "table empty, skipping delete");
    }

    let inserted = if batch.is_empty() {
        0
    } else {
        tracing::info!(table = label, rows = batch.len(), "bulk inserting");
        insert_query(batch)
            .build()
            .execute(&mut *conn)
            .await
            .map_err(map_err("bulk insert"))?
            .rows_affected()
    };

    Ok(SeedReport {
        table,
        existing: existing.max(0) as u64,
        inserted,
    })
}

/// Single multi-row INSERT for a batch, with a conflict guard on the key
fn insert_query(batch: &SeedBatch) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("");
    match batch {
        SeedBatch::Users(rows) => {
            qb.push("INSERT INTO users (id, name, email, password) ");
            qb.push_values(rows, |mut b, user| {
                b.push_bind(user.id)
                    .push_bind(user.name.clone())
                    .push_bind(user.email.clone())
                    .push_bind(user.password.clone());
            });
            qb.push(" ON CONFLICT (id) DO NOTHING");
        }
        SeedBatch::Customers(rows) => {
            qb.push("INSERT INTO customers (id, name, email, image_url) ");
            qb.push_values(rows, |mut b, customer| {
                b.push_bind(customer.id)
                    .push_bind(customer.name.clone())
                    .push_bind(customer.email.clone())
                    .push_bind(customer.image_url.clone());
            });
            qb.push(" ON CONFLICT (id) DO NOTHING");
        }
        SeedBatch::Invoices(rows) => {
            qb.push("INSERT INTO invoices (customer_id, amount, status, date) ");
            qb.push_values(rows, |mut b, invoice| {
                b.push_bind(invoice.customer_id.clone())
                    .push_unseparated("::uuid")
                    .push_bind(invoice.amount)
                    .push_bind(invoice.status.as_str())
                    .push_bind(invoice.date);
            });
            qb.push(" ON CONFLICT (id) DO NOTHING");
        }
        SeedBatch::Revenue(rows) => {
            qb.push("INSERT INTO revenue (month, revenue) ");
            qb.push_values(rows, |mut b, revenue| {
                b.push_bind(revenue.month.clone())
                    .push_bind(revenue.revenue);
            });
            qb.push(" ON CONFLICT (month) DO NOTHING");
        }
    }
    qb
}
