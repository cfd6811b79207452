use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::error::StoreError;
use crate::store::Store;
use crate::types::{
    Coupon, NewCoupon, NewOrder, NewProduct, NewUser, Order, OrderFilter, OrderStatus, Product,
    ProductFilter, ProductPage, User, UserFilter,
};
use crate::{coupons, orders, products, users};

/// PostgreSQL-backed [`Store`]
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and bring the schema up to date
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("Running database migrations");
        sqlx::migrate!()
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database(sqlx::Error::Migrate(Box::new(e))))?;

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        Ok(products::create(&self.pool, &product).await?)
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        Ok(products::get(&self.pool, id).await?)
    }

    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        Ok(products::update(&self.pool, product).await?)
    }

    async fn delete_product(&self, id: i64) -> Result<bool, StoreError> {
        Ok(products::delete(&self.pool, id).await?)
    }

    async fn find_products(
        &self,
        filter: &ProductFilter,
        page: &ProductPage,
    ) -> Result<Vec<Product>, StoreError> {
        Ok(products::find(&self.pool, filter, page).await?)
    }

    async fn count_products(&self, filter: &ProductFilter) -> Result<i64, StoreError> {
        Ok(products::count(&self.pool, filter).await?)
    }

    async fn product_categories(&self) -> Result<Vec<String>, StoreError> {
        Ok(products::categories(&self.pool).await?)
    }

    async fn decrement_stock(&self, id: i64, quantity: i64) -> Result<bool, StoreError> {
        Ok(products::decrement_stock(&self.pool, id, quantity).await?)
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        orders::create(&self.pool, &order).await
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        orders::get(&self.pool, id).await
    }

    async fn find_orders(
        &self,
        filter: &OrderFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Order>, StoreError> {
        orders::find(&self.pool, filter, limit).await
    }

    async fn count_orders(&self, filter: &OrderFilter) -> Result<i64, StoreError> {
        Ok(orders::count(&self.pool, filter).await?)
    }

    async fn set_order_status(&self, id: i64, status: OrderStatus) -> Result<(), StoreError> {
        Ok(orders::set_status(&self.pool, id, status).await?)
    }

    async fn delete_order(&self, id: i64) -> Result<bool, StoreError> {
        Ok(orders::delete(&self.pool, id).await?)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        users::create(&self.pool, &user).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        users::get(&self.pool, id).await
    }

    async fn find_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        users::find(&self.pool, filter).await
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<i64, StoreError> {
        Ok(users::count(&self.pool, filter).await?)
    }

    async fn user_names(&self, ids: &[String]) -> Result<HashMap<String, String>, StoreError> {
        Ok(users::names(&self.pool, ids).await?)
    }

    async fn delete_user(&self, id: &str) -> Result<bool, StoreError> {
        Ok(users::delete(&self.pool, id).await?)
    }

    async fn create_coupon(&self, coupon: NewCoupon) -> Result<Coupon, StoreError> {
        coupons::create(&self.pool, &coupon).await
    }

    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, StoreError> {
        Ok(coupons::find_by_code(&self.pool, code).await?)
    }

    async fn list_coupons(&self) -> Result<Vec<Coupon>, StoreError> {
        Ok(coupons::list(&self.pool).await?)
    }

    async fn delete_coupon(&self, id: i64) -> Result<bool, StoreError> {
        Ok(coupons::delete(&self.pool, id).await?)
    }
}
