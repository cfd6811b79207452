pub mod coupons;
pub mod error;
pub mod memory;
pub mod orders;
pub mod pg;
pub mod products;
pub mod store;
pub mod types;
pub mod users;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use sqlx::postgres::PgPool;
pub use store::Store;
pub use types::*;
