//! Invoice form schema
//!
//! Turns a raw [`FormData`] submission into an [`InvoiceDraft`] or a
//! [`FieldErrors`] map. Every field is checked so the form can show all
//! problems at once. `id` and `date` are never read from the form.

use super::validators::{coerce_number, greater_than, in_list, required};
use crate::core::form::FormData;
use crate::core::state::FieldErrors;
use crate::entities::{InvoiceDraft, InvoiceStatus};

pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub const AMOUNT_NOT_POSITIVE: &str = "Please enter an amount greater than 0.";
pub const STATUS_INVALID: &str = "Please select an invoice status.";

const STATUS_VALUES: &[&str] = &["pending", "paid"];

/// Schema for the create and update invoice forms
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceSchema;

impl InvoiceSchema {
    /// Validate a submission
    pub fn parse(&self, form: &FormData) -> Result<InvoiceDraft, FieldErrors> {
        let mut errors = FieldErrors::default();

        let customer_id = form.get("customerId");
        if let Err(msg) = required(CUSTOMER_REQUIRED)(customer_id) {
            errors.push("customerId", msg);
        }

        // Positivity is checked on the stored cents, so sub-cent amounts fail.
        let amount_in_cents = match coerce_number(form.get("amount")) {
            Ok(n) => {
                let cents = to_cents(n);
                match greater_than(0.0, AMOUNT_NOT_POSITIVE)(cents as f64) {
                    Ok(()) => Some(cents),
                    Err(msg) => {
                        errors.push("amount", msg);
                        None
                    }
                }
            }
            Err(msg) => {
                errors.push("amount", msg);
                None
            }
        };

        let status_raw = form.get("status");
        if let Err(msg) = in_list(STATUS_VALUES, STATUS_INVALID)(status_raw) {
            errors.push("status", msg);
        }
        let status = status_raw.and_then(|s| s.parse::<InvoiceStatus>().ok());

        match (customer_id, amount_in_cents, status) {
            (Some(customer_id), Some(amount_in_cents), Some(status)) if errors.is_empty() => {
                Ok(InvoiceDraft {
                    customer_id: customer_id.to_string(),
                    amount_in_cents,
                    status,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Convert a currency amount to integer cents
///
/// Rounds to the nearest cent so binary floating point artifacts such as
/// `0.29 * 100 = 28.999...` land on the intended value.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
