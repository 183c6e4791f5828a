//! Core types shared by the form actions, the seed route and the stores

pub mod cache;
pub mod error;
pub mod form;
pub mod service;
pub mod state;
pub mod validation;

pub use cache::{Revalidation, ViewCache};
pub use error::{DashboardError, ErrorResponse, SeedError};
pub use form::FormData;
pub use service::{InvoiceStore, SeedBatch, SeedReport, SeedStore, SeedTable, UserStore};
pub use state::{ActionOutcome, FieldErrors, FormState};
