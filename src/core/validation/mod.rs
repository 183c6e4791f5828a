//! Form validation
//!
//! Closure-based field validators and the invoice form schema built on them.

pub mod schema;
pub mod validators;

pub use schema::{InvoiceSchema, to_cents};
