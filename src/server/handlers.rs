//! HTTP handlers for the dashboard routes
//!
//! Handlers only translate between HTTP and the action services; every
//! decision about messages, redirects and revalidation lives in the services.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::auth::LoginAction;
use crate::core::error::DashboardError;
use crate::core::form::FormData;
use crate::core::state::{ActionOutcome, FormState};
use crate::invoices::InvoiceActions;
use crate::seed::{SeedSelection, Seeder};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub invoices: InvoiceActions,
    pub login: LoginAction,
    pub seeder: Seeder,
}

/// Query string of the seed route
#[derive(Debug, Default, Deserialize)]
pub struct SeedQuery {
    pub table: Option<String>,
}

/// GET /seed?table=<name>
pub async fn seed(
    State(state): State<AppState>,
    Query(query): Query<SeedQuery>,
) -> Result<Json<Value>, DashboardError> {
    let selection = SeedSelection::from_query(query.table.as_deref()).map_err(|e| {
        tracing::warn!(error = %e, "seed request rejected");
        e
    })?;
    let message = state.seeder.seed(selection).await?;
    Ok(Json(json!({ "message": message })))
}

/// GET /dashboard/invoices
pub async fn list_invoices(State(state): State<AppState>) -> Result<Json<Value>, DashboardError> {
    let view = state.invoices.listing().await?;
    Ok(Json(view))
}

/// POST /dashboard/invoices/create
pub async fn create_invoice(State(state): State<AppState>, form: FormData) -> ActionOutcome {
    state
        .invoices
        .create_invoice(&FormState::default(), &form)
        .await
}

/// POST /dashboard/invoices/{id}/edit
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: FormData,
) -> ActionOutcome {
    state
        .invoices
        .update_invoice(&id, &FormState::default(), &form)
        .await
}

/// POST /dashboard/invoices/{id}/delete
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FormState>, DashboardError> {
    let result = state.invoices.delete_invoice(&id).await?;
    Ok(Json(result))
}

/// POST /login
pub async fn login(State(state): State<AppState>, form: FormData) -> ActionOutcome {
    state.login.login(&form).await.into()
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-dashboard"
    }))
}
