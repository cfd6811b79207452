//! Storefront response cache
//!
//! A process-wide key/value store of JSON-encoded responses, read through on
//! cache misses and purged by an invalidation policy whenever a product,
//! order or coupon is written. Entries never expire on their own.

mod error;
pub mod invalidation;
pub mod keys;
mod store;

pub use error::CacheError;
pub use invalidation::InvalidationEvent;
pub use keys::CacheKey;
pub use store::KvCache;
