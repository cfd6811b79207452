use std::sync::Arc;

use storefront_cache::KvCache;
use storefront_db::Store;
use storefront_payments::PaymentProcessor;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub cache: KvCache,
    pub payments: Arc<dyn PaymentProcessor>,
    /// Page size of the product search endpoint
    pub product_per_page: i64,
}
