//! Storefront API
//!
//! Serves the product catalogue, orders, coupons and payment intents, plus the
//! admin dashboard aggregates, behind a read-through response cache.

mod auth;
mod config;
mod constants;
mod dashboard;
mod error;
mod router;
mod routes;
mod state;
#[cfg(test)]
mod test_support;
mod validation;

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use storefront_cache::KvCache;
use storefront_db::{MemoryStore, PgStore, Store};
use storefront_payments::{PaymentProcessor, StripeClient};
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::Config;
use crate::constants::DB_MAX_CONNECTIONS;
use crate::router::create_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("storefront_api=info".parse()?)
        .add_directive("tower_http=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Config::from_env();
    info!(port = config.port, "Starting storefront-api");

    let store: Arc<dyn Store> = if config.uses_memory_store() {
        warn!("Using the in-memory store, data is lost on restart");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(PgStore::connect(&config.database_url, DB_MAX_CONNECTIONS).await?)
    };

    if config.stripe_key.is_empty() {
        warn!("STRIPE_KEY not set, payment intents will be rejected");
    }
    let payments: Arc<dyn PaymentProcessor> = Arc::new(match &config.stripe_api_url {
        Some(url) => StripeClient::with_base_url(&config.stripe_key, url)?,
        None => StripeClient::new(&config.stripe_key)?,
    });

    let state = AppState {
        store,
        cache: KvCache::new(),
        payments,
        product_per_page: config.product_per_page,
    };

    let app = create_router(state, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
