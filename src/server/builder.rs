//! ServerBuilder for wiring stores, services and routes into a server

use super::handlers::AppState;
use super::router::build_router;
use crate::auth::{AuthProvider, CredentialsProvider, LoginAction};
use crate::config::DashboardConfig;
use crate::core::cache::ViewCache;
use crate::core::service::{InvoiceStore, SeedStore, UserStore};
use crate::invoices::InvoiceActions;
use crate::seed::Seeder;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the dashboard HTTP server
///
/// # Example
///
/// ```ignore
/// let store = PostgresStore::connect(&config.database).await?;
/// ServerBuilder::new()
///     .with_config(config)
///     .with_store(store)
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: DashboardConfig,
    invoice_store: Option<Arc<dyn InvoiceStore>>,
    user_store: Option<Arc<dyn UserStore>>,
    seed_store: Option<Arc<dyn SeedStore>>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    cache: Option<ViewCache>,
    hash_cost: Option<u32>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: DashboardConfig::default(),
            invoice_store: None,
            user_store: None,
            seed_store: None,
            auth_provider: None,
            cache: None,
            hash_cost: None,
        }
    }

    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    /// Use one backend for invoices, users and seeding
    pub fn with_store<S>(mut self, store: S) -> Self
    where
        S: InvoiceStore + UserStore + SeedStore + 'static,
    {
        let store = Arc::new(store);
        self.invoice_store = Some(store.clone() as Arc<dyn InvoiceStore>);
        self.user_store = Some(store.clone() as Arc<dyn UserStore>);
        self.seed_store = Some(store as Arc<dyn SeedStore>);
        self
    }

    pub fn with_invoice_store(mut self, store: Arc<dyn InvoiceStore>) -> Self {
        self.invoice_store = Some(store);
        self
    }

    pub fn with_user_store(mut self, store: Arc<dyn UserStore>) -> Self {
        self.user_store = Some(store);
        self
    }

    pub fn with_seed_store(mut self, store: Arc<dyn SeedStore>) -> Self {
        self.seed_store = Some(store);
        self
    }

    /// Replace the credentials provider built from the user store
    pub fn with_auth_provider(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.auth_provider = Some(provider);
        self
    }

    /// Share a view cache with the caller (e.g. to watch revalidations)
    pub fn with_cache(mut self, cache: ViewCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// bcrypt cost used when seeding users
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = Some(cost);
        self
    }

    /// Assemble the services behind the routes
    pub fn build_state(self) -> Result<AppState> {
        self.config.invoices.validate()?;
        let invoice_store = self.invoice_store.ok_or_else(|| {
            anyhow::anyhow!("InvoiceStore is required. Call .with_store() or .with_invoice_store()")
        })?;
        let seed_store = self.seed_store.ok_or_else(|| {
            anyhow::anyhow!("SeedStore is required. Call .with_store() or .with_seed_store()")
        })?;
        let provider = match (self.auth_provider, self.user_store) {
            (Some(provider), _) => provider,
            (None, Some(users)) => Arc::new(CredentialsProvider::new(
                users,
                self.config.auth.default_redirect.clone(),
            )),
            (None, None) => anyhow::bail!(
                "UserStore or AuthProvider is required. Call .with_store() or .with_user_store()"
            ),
        };

        let cache = self.cache.unwrap_or_default();
        let mut seeder = Seeder::new(seed_store);
        if let Some(cost) = self.hash_cost {
            seeder = seeder.with_hash_cost(cost);
        }

        Ok(AppState {
            invoices: InvoiceActions::new(invoice_store, cache, &self.config.invoices),
            login: LoginAction::new(provider),
            seeder,
        })
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        Ok(build_router(self.build_state()?))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds `addr`, serves until SIGTERM or Ctrl+C, then drains in-flight
    /// requests.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeleteMode;
    use crate::storage::InMemoryStore;

    #[test]
    fn test_build_without_store_fails() {
        let err = ServerBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("InvoiceStore is required"));
    }

    #[test]
    fn test_build_without_users_or_provider_fails() {
        let store = Arc::new(InMemoryStore::new());
        let err = ServerBuilder::new()
            .with_invoice_store(store.clone())
            .with_seed_store(store)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("UserStore or AuthProvider"));
    }

    #[test]
    fn test_state_follows_config() {
        let mut config = DashboardConfig::default();
        config.invoices.delete_mode = DeleteMode::Legacy;
        config.invoices.listing_path = "/app/invoices".to_string();

        let state = ServerBuilder::new()
            .with_config(config)
            .with_store(InMemoryStore::new())
            .build_state()
            .unwrap();

        assert_eq!(state.invoices.delete_mode(), DeleteMode::Legacy);
        assert_eq!(state.invoices.listing_path(), "/app/invoices");
    }

    #[test]
    fn test_root_listing_path_fails_instead_of_panicking() {
        let mut config = DashboardConfig::default();
        config.invoices.listing_path = "/".to_string();

        let err = ServerBuilder::new()
            .with_config(config)
            .with_store(InMemoryStore::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("root path"));
    }

    #[test]
    fn test_trailing_slash_listing_path_is_normalized() {
        let mut config = DashboardConfig::default();
        config.invoices.listing_path = "/dashboard/invoices/".to_string();

        let state = ServerBuilder::new()
            .with_config(config)
            .with_store(InMemoryStore::new())
            .build_state()
            .unwrap();
        assert_eq!(state.invoices.listing_path(), "/dashboard/invoices");
    }

    #[test]
    fn test_build_with_store() {
        assert!(
            ServerBuilder::new()
                .with_store(InMemoryStore::new())
                .build()
                .is_ok()
        );
    }
}
