use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{
    Coupon, NewCoupon, NewOrder, NewProduct, NewUser, Order, OrderFilter, OrderStatus, Product,
    ProductFilter, ProductPage, User, UserFilter,
};

/// Persistence operations the storefront API relies on.
///
/// Implemented by [`crate::PgStore`] for production and [`crate::MemoryStore`]
/// for tests and local development. Lookups by id return `Ok(None)` when
/// nothing matches; deletes report whether a row was removed.
#[async_trait]
pub trait Store: Send + Sync {
    // Products
    async fn create_product(&self, product: NewProduct) -> Result<Product, StoreError>;
    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError>;
    /// Persist name, photo, price, stock and category of `product`
    async fn update_product(&self, product: &Product) -> Result<(), StoreError>;
    async fn delete_product(&self, id: i64) -> Result<bool, StoreError>;
    async fn find_products(
        &self,
        filter: &ProductFilter,
        page: &ProductPage,
    ) -> Result<Vec<Product>, StoreError>;
    async fn count_products(&self, filter: &ProductFilter) -> Result<i64, StoreError>;
    /// Distinct categories, sorted
    async fn product_categories(&self) -> Result<Vec<String>, StoreError>;
    /// Subtract `quantity` from a product's stock. `false` if the product
    /// does not exist.
    async fn decrement_stock(&self, id: i64, quantity: i64) -> Result<bool, StoreError>;

    // Orders
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError>;
    async fn get_order(&self, id: i64) -> Result<Option<Order>, StoreError>;
    /// Newest first
    async fn find_orders(
        &self,
        filter: &OrderFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Order>, StoreError>;
    async fn count_orders(&self, filter: &OrderFilter) -> Result<i64, StoreError>;
    async fn set_order_status(&self, id: i64, status: OrderStatus) -> Result<(), StoreError>;
    async fn delete_order(&self, id: i64) -> Result<bool, StoreError>;

    // Users
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn find_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError>;
    async fn count_users(&self, filter: &UserFilter) -> Result<i64, StoreError>;
    /// Display names keyed by user id; unknown ids are left out
    async fn user_names(&self, ids: &[String]) -> Result<HashMap<String, String>, StoreError>;
    async fn delete_user(&self, id: &str) -> Result<bool, StoreError>;

    // Coupons
    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, StoreError>;
    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, StoreError>;
    async fn list_coupons(&self) -> Result<Vec<Coupon>, StoreError>;
    async fn delete_coupon(&self, id: i64) -> Result<bool, StoreError>;
}
