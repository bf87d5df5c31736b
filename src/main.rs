//! Invoice server binary
//!
//! Configuration comes from the YAML file named by `INVOICES_CONFIG` plus
//! `INVOICES_*` environment overrides; see [`invoices::config`].

use anyhow::{Context, Result};
use invoices::config::{AppConfig, AuthConfig, StoreConfig};
use invoices::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load().context("loading configuration")?;

    // RUST_LOG wins over the configured filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = build_store(&config.store).await?;
    let provider: Arc<dyn AuthProvider> = match &config.auth {
        AuthConfig::Disabled => {
            tracing::warn!("authentication disabled, every route is public");
            Arc::new(NoAuthProvider)
        }
        AuthConfig::Jwt { secret, policy } => {
            tracing::info!(%policy, "JWT authentication enabled");
            Arc::new(JwtAuthProvider::new(secret))
        }
    };

    ServerBuilder::new()
        .with_shared_store(store)
        .with_shared_auth_provider(provider)
        .with_policy(config.auth.policy())
        .serve(&config.listen_addr())
        .await
}

async fn build_store(config: &StoreConfig) -> Result<Arc<dyn InvoiceStore>> {
    match config {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory invoice store");
            Ok(Arc::new(InMemoryInvoiceStore::new()))
        }
        #[cfg(feature = "mongodb_backend")]
        StoreConfig::Mongodb { uri, database } => {
            use invoices::storage::MongoInvoiceStore;

            tracing::info!(%database, "using MongoDB invoice store");
            let store = MongoInvoiceStore::connect(uri, database).await?;
            store.ensure_indexes().await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongodb_backend"))]
        StoreConfig::Mongodb { .. } => {
            anyhow::bail!("MongoDB store requested but the `mongodb_backend` feature is disabled")
        }
    }
}
