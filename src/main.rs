use dashboard::config::DashboardConfig;
use dashboard::server::ServerBuilder;
use dashboard::storage::PostgresStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = DashboardConfig::load()?;
    let store = PostgresStore::connect(&config.database).await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        require_tls = config.database.require_tls,
        "database pool ready"
    );

    let bind = config.server.bind.clone();
    ServerBuilder::new()
        .with_config(config)
        .with_store(store)
        .serve(&bind)
        .await
}
