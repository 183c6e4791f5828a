//! Route table

use super::handlers::{
    AppState, create_invoice, delete_invoice, health_check, list_invoices, login, seed,
    update_invoice,
};
use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Build the dashboard routes
///
/// - GET /seed?table=<name> - (Re)seed one table or all of them
/// - GET {listing} - Cached invoice listing
/// - POST {listing}/create - createInvoice
/// - POST {listing}/{id}/edit - updateInvoice
/// - POST {listing}/{id}/delete - deleteInvoice
/// - POST /login - authenticate
/// - GET /health, /healthz - Liveness
pub fn build_router(state: AppState) -> Router {
    let listing = state.invoices.listing_path().to_string();

    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/seed", get(seed))
        .route(&listing, get(list_invoices))
        .route(&format!("{}/create", listing), post(create_invoice))
        .route(&format!("{}/{{id}}/edit", listing), post(update_invoice))
        .route(&format!("{}/{{id}}/delete", listing), post(delete_invoice))
        .route("/login", post(login))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
