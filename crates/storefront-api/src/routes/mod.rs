pub mod dashboard;
pub mod health;
pub mod orders;
pub mod payment;
pub mod products;
pub mod users;

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use storefront_cache::CacheKey;

use crate::error::AppError;
use crate::state::AppState;

/// Parse a numeric path id, rejecting anything else as a bad request
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid ID".into()))
}

/// Serve `key` from the response cache, running `loader` on a miss
pub(crate) async fn cached<T, F, Fut>(
    state: &AppState,
    key: &CacheKey,
    loader: F,
) -> Result<T, AppError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    state.cache.read_through(key, loader).await
}
