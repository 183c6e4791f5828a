//! # Invoice Dashboard
//!
//! Backend for a small invoice dashboard.
//!
//! ## Features
//!
//! - **Invoice form actions**: create, update and delete invoices with
//!   field-level validation, then revalidate the cached listing
//! - **Credentials sign-in**: email/password against bcrypt hashes, with a
//!   two-message error taxonomy for the form
//! - **Seeding**: `GET /seed` rebuilds the users, customers, invoices and
//!   revenue tables from fixtures, one table or all in one transaction
//! - **Pluggable storage**: PostgreSQL via sqlx, plus an in-memory store
//!   for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dashboard::prelude::*;
//!
//! let config = DashboardConfig::load()?;
//! let store = PostgresStore::connect(&config.database).await?;
//! let bind = config.server.bind.clone();
//!
//! ServerBuilder::new()
//!     .with_config(config)
//!     .with_store(store)
//!     .serve(&bind)
//!     .await?;
//! ```

pub mod auth;
pub mod config;
pub mod core;
pub mod entities;
pub mod invoices;
pub mod seed;
pub mod server;
pub mod storage;
pub mod ui;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ActionOutcome, DashboardError, FieldErrors, FormData, FormState, InvoiceStore,
        SeedError, SeedStore, SeedTable, UserStore, ViewCache,
    };

    // === Entities ===
    pub use crate::entities::{
        Customer, Invoice, InvoiceDraft, InvoiceStatus, NewInvoice, Revenue, User,
    };

    // === Actions ===
    pub use crate::auth::{AuthProvider, CredentialsProvider, LoginAction, LoginOutcome};
    pub use crate::invoices::InvoiceActions;
    pub use crate::seed::{SeedSelection, Seeder};

    // === Storage ===
    pub use crate::storage::{InMemoryStore, StorageError};
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{DashboardConfig, DeleteMode};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
}
