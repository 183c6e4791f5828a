//! Invoice form actions
//!
//! Create and update run validate → convert to cents → persist → revalidate
//! the listing → redirect. Validation and database failures come back as a
//! [`FormState`] for the form to render; nothing is persisted or revalidated
//! on those paths.

use crate::config::{DeleteMode, InvoicesConfig};
use crate::core::cache::ViewCache;
use crate::core::error::DashboardError;
use crate::core::form::FormData;
use crate::core::service::InvoiceStore;
use crate::core::state::{ActionOutcome, FormState};
use crate::core::validation::InvoiceSchema;
use crate::entities::NewInvoice;
use crate::storage::StorageError;
use chrono::{NaiveDate, Utc};
use serde_json::{Value, json};
use std::sync::Arc;

pub const CREATE_INVALID: &str = "Missing Fields. Failed to Create Invoice.";
pub const CREATE_FAILED: &str = "Database Error: Failed to create invoice.";
pub const UPDATE_INVALID: &str = "Missing Fields. Failed to Update Invoice.";
pub const UPDATE_FAILED: &str = "Database Error: Failed to update invoice.";
pub const DELETE_FAILED: &str = "Database Error: Failed to delete invoice.";
pub const DELETE_LEGACY_ERROR: &str = "Failed to Delete Invoice";

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Server-side invoice actions
#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    cache: ViewCache,
    listing_path: String,
    delete_mode: DeleteMode,
    today: Clock,
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, cache: ViewCache, config: &InvoicesConfig) -> Self {
        Self {
            store,
            cache,
            listing_path: config.listing_route().to_string(),
            delete_mode: config.delete_mode,
            today: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Replace the source of "today" used to date new invoices
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    pub fn listing_path(&self) -> &str {
        &self.listing_path
    }

    pub fn delete_mode(&self) -> DeleteMode {
        self.delete_mode
    }

    /// `createInvoice`
    pub async fn create_invoice(&self, _previous: &FormState, form: &FormData) -> ActionOutcome {
        let draft = match InvoiceSchema.parse(form) {
            Ok(draft) => draft,
            Err(errors) => {
                tracing::debug!(?errors, "create invoice rejected");
                return ActionOutcome::State(FormState::invalid(errors, CREATE_INVALID));
            }
        };

        tracing::info!(
            customer_id = %draft.customer_id,
            amount = draft.amount_in_cents,
            status = %draft.status,
            "creating invoice"
        );

        let invoice = NewInvoice::from_draft(draft, (self.today)());
        if let Err(e) = self.store.insert(&invoice).await {
            tracing::error!(error = %e, "Database Error: failed to create invoice");
            return ActionOutcome::State(FormState::message(CREATE_FAILED));
        }

        self.finish_mutation()
    }

    /// `updateInvoice`
    ///
    /// `id` is trusted as given; an id matching no row still redirects.
    pub async fn update_invoice(
        &self,
        id: &str,
        _previous: &FormState,
        form: &FormData,
    ) -> ActionOutcome {
        let draft = match InvoiceSchema.parse(form) {
            Ok(draft) => draft,
            Err(errors) => {
                tracing::debug!(id, ?errors, "update invoice rejected");
                return ActionOutcome::State(FormState::invalid(errors, UPDATE_INVALID));
            }
        };

        if let Err(e) = self.store.update(id, &draft).await {
            tracing::error!(id, error = %e, "Database Error: failed to update invoice");
            return ActionOutcome::State(FormState::message(UPDATE_FAILED));
        }

        self.finish_mutation()
    }

    /// `deleteInvoice`, dispatched on the configured [`DeleteMode`]
    pub async fn delete_invoice(&self, id: &str) -> Result<FormState, DashboardError> {
        match self.delete_mode {
            DeleteMode::Intended => Ok(self.delete_invoice_intended(id).await),
            DeleteMode::Legacy => self.delete_invoice_legacy(id),
        }
    }

    /// Delete by id and revalidate the listing; no redirect
    ///
    /// An unknown id deletes nothing and still succeeds.
    pub async fn delete_invoice_intended(&self, id: &str) -> FormState {
        if let Err(e) = self.store.delete(id).await {
            tracing::error!(id, error = %e, "Database Error: failed to delete invoice");
            return FormState::message(DELETE_FAILED);
        }

        self.cache.revalidate_path(&self.listing_path);
        FormState::default()
    }

    /// Always fails before reaching storage
    pub fn delete_invoice_legacy(&self, id: &str) -> Result<FormState, DashboardError> {
        tracing::warn!(id, "legacy delete mode refuses every delete");
        Err(DashboardError::Internal(DELETE_LEGACY_ERROR.to_string()))
    }

    /// Invoice listing view, served from the cache when fresh
    pub async fn listing(&self) -> Result<Value, StorageError> {
        let store = self.store.clone();
        self.cache
            .get_or_compute(&self.listing_path, || async move {
                let invoices = store.list().await?;
                Ok::<_, StorageError>(json!({
                    "invoices": invoices,
                    "count": invoices.len(),
                }))
            })
            .await
    }

    fn finish_mutation(&self) -> ActionOutcome {
        self.cache.revalidate_path(&self.listing_path);
        ActionOutcome::redirect(self.listing_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;

    fn actions(store: &InMemoryStore) -> InvoiceActions {
        InvoiceActions::new(
            Arc::new(store.clone()),
            ViewCache::default(),
            &InvoicesConfig::default(),
        )
        .with_clock(|| NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    fn valid_form() -> FormData {
        FormData::new()
            .with("customerId", "c1")
            .with("amount", "10.50")
            .with("status", "paid")
    }

    #[tokio::test]
    async fn test_create_uses_clock_for_date() {
        let store = InMemoryStore::with_tables();
        let outcome = actions(&store)
            .create_invoice(&FormState::default(), &valid_form())
            .await;

        assert_eq!(outcome, ActionOutcome::redirect("/dashboard/invoices"));
        let rows = store.invoices();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 1050);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[tokio::test]
    async fn test_invalid_create_does_not_touch_storage() {
        let store = InMemoryStore::with_tables();
        let form = FormData::new()
            .with("customerId", "c1")
            .with("amount", "-3")
            .with("status", "paid");

        let outcome = actions(&store)
            .create_invoice(&FormState::default(), &form)
            .await;

        let state = outcome.state().unwrap();
        assert_eq!(state.message.as_deref(), Some(CREATE_INVALID));
        assert!(state.errors.as_ref().unwrap().amount.is_some());
        assert!(store.invoices().is_empty());
    }

    #[tokio::test]
    async fn test_legacy_delete_always_fails() {
        let store = InMemoryStore::with_tables();
        let config = InvoicesConfig {
            delete_mode: DeleteMode::Legacy,
            ..InvoicesConfig::default()
        };
        let actions = InvoiceActions::new(Arc::new(store.clone()), ViewCache::default(), &config);
        actions
            .create_invoice(&FormState::default(), &valid_form())
            .await;

        let id = store.invoices()[0].id.clone();
        let err = actions.delete_invoice(&id).await.unwrap_err();
        assert_eq!(err.to_string(), DELETE_LEGACY_ERROR);
        assert_eq!(store.invoices().len(), 1);
    }

    #[tokio::test]
    async fn test_listing_is_cached_until_mutation() {
        let store = InMemoryStore::with_tables();
        let actions = actions(&store);

        assert_eq!(actions.listing().await.unwrap()["count"], 0);
        actions
            .create_invoice(&FormState::default(), &valid_form())
            .await;
        assert_eq!(actions.listing().await.unwrap()["count"], 1);

        // A write that bypasses the actions is not visible until revalidation.
        store
            .insert(&NewInvoice {
                customer_id: "c9".into(),
                amount: 1,
                status: crate::entities::InvoiceStatus::Pending,
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(actions.listing().await.unwrap()["count"], 1);

        let id = store.invoices()[0].id.clone();
        assert_eq!(actions.delete_invoice_intended(&id).await, FormState::default());
        assert_eq!(actions.listing().await.unwrap()["count"], 1);
    }
}
