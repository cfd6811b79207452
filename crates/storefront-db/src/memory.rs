//! In-process [`Store`] used by tests and for running the API without a
//! database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::store::Store;
use crate::types::{
    Coupon, NewCoupon, NewOrder, NewProduct, NewUser, Order, OrderFilter, OrderStatus, Product,
    ProductFilter, ProductPage, ProductSort, Role, User, UserFilter,
};

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    orders: Vec<Order>,
    users: Vec<User>,
    coupons: Vec<Coupon>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert fully formed rows, keeping their ids and timestamps. Useful
    /// for seeding data with specific creation dates.
    pub async fn seed_product(&self, product: Product) {
        let mut t = self.tables.write().await;
        t.next_id = t.next_id.max(product.id);
        t.products.push(product);
    }

    pub async fn seed_order(&self, order: Order) {
        let mut t = self.tables.write().await;
        t.next_id = t.next_id.max(order.id);
        t.orders.push(order);
    }

    pub async fn seed_user(&self, user: User) {
        self.tables.write().await.users.push(user);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_product(&self, p: NewProduct) -> Result<Product, StoreError> {
        let mut t = self.tables.write().await;
        let now = Utc::now();
        let product = Product {
            id: t.next_id(),
            name: p.name,
            photo: p.photo,
            price: p.price,
            stock: p.stock,
            category: p.category,
            created_at: now,
            updated_at: now,
        };
        t.products.push(product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.products.iter().find(|p| p.id == id).cloned())
    }

    async fn update_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        if let Some(existing) = t.products.iter_mut().find(|p| p.id == product.id) {
            existing.name = product.name.clone();
            existing.photo = product.photo.clone();
            existing.price = product.price;
            existing.stock = product.stock;
            existing.category = product.category.clone();
            existing.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_product(&self, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let before = t.products.len();
        t.products.retain(|p| p.id != id);
        Ok(t.products.len() < before)
    }

    async fn find_products(
        &self,
        filter: &ProductFilter,
        page: &ProductPage,
    ) -> Result<Vec<Product>, StoreError> {
        let t = self.tables.read().await;
        let mut found: Vec<Product> = t
            .products
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        match page.sort {
            ProductSort::Unsorted => found.sort_by_key(|p| p.id),
            ProductSort::Newest => {
                found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
            }
            ProductSort::PriceAsc => found.sort_by(|a, b| a.price.total_cmp(&b.price)),
            ProductSort::PriceDesc => found.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }

        let offset = usize::try_from(page.offset).unwrap_or(0);
        let limit = page
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);
        Ok(found.into_iter().skip(offset).take(limit).collect())
    }

    async fn count_products(&self, filter: &ProductFilter) -> Result<i64, StoreError> {
        let t = self.tables.read().await;
        Ok(t.products.iter().filter(|p| filter.matches(p)).count() as i64)
    }

    async fn product_categories(&self) -> Result<Vec<String>, StoreError> {
        let t = self.tables.read().await;
        let mut categories: Vec<String> = t.products.iter().map(|p| p.category.clone()).collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn decrement_stock(&self, id: i64, quantity: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        match t.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.stock -= quantity;
                product.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_order(&self, o: NewOrder) -> Result<Order, StoreError> {
        let mut t = self.tables.write().await;
        let now = Utc::now();
        let order = Order {
            id: t.next_id(),
            shipping_info: o.shipping_info,
            user: o.user,
            sub_total: o.sub_total,
            tax: o.tax,
            shipping_charges: o.shipping_charges,
            discount: o.discount,
            total: o.total,
            status: OrderStatus::Processing,
            order_items: o.order_items,
            created_at: now,
            updated_at: now,
        };
        t.orders.push(order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: i64) -> Result<Option<Order>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_orders(
        &self,
        filter: &OrderFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Order>, StoreError> {
        let t = self.tables.read().await;
        let mut found: Vec<Order> = t
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        if let Some(limit) = limit.and_then(|l| usize::try_from(l).ok()) {
            found.truncate(limit);
        }
        Ok(found)
    }

    async fn count_orders(&self, filter: &OrderFilter) -> Result<i64, StoreError> {
        let t = self.tables.read().await;
        Ok(t.orders.iter().filter(|o| filter.matches(o)).count() as i64)
    }

    async fn set_order_status(&self, id: i64, status: OrderStatus) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        if let Some(order) = t.orders.iter_mut().find(|o| o.id == id) {
            order.status = status;
            order.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete_order(&self, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let before = t.orders.len();
        t.orders.retain(|o| o.id != id);
        Ok(t.orders.len() < before)
    }

    async fn create_user(&self, u: NewUser) -> Result<User, StoreError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|existing| existing.id == u.id || existing.email == u.email) {
            return Err(StoreError::Conflict("User already exists".into()));
        }
        let now = Utc::now();
        let user = User {
            id: u.id,
            name: u.name,
            email: u.email,
            photo: u.photo,
            role: Role::default(),
            gender: u.gender,
            dob: u.dob,
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_users(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().filter(|u| filter.matches(u)).cloned().collect())
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<i64, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users.iter().filter(|u| filter.matches(u)).count() as i64)
    }

    async fn user_names(&self, ids: &[String]) -> Result<HashMap<String, String>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(|u| (u.id.clone(), u.name.clone()))
            .collect())
    }

    async fn delete_user(&self, id: &str) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        Ok(t.users.len() < before)
    }

    async fn create_coupon(&self, c: NewCoupon) -> Result<Coupon, StoreError> {
        let mut t = self.tables.write().await;
        if t.coupons.iter().any(|existing| existing.code == c.code) {
            return Err(StoreError::Conflict("Coupon code already exists".into()));
        }
        let coupon = Coupon {
            id: t.next_id(),
            code: c.code,
            amount: c.amount,
            created_at: Utc::now(),
        };
        t.coupons.push(coupon.clone());
        Ok(coupon)
    }

    async fn find_coupon(&self, code: &str) -> Result<Option<Coupon>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.coupons.iter().find(|c| c.code == code).cloned())
    }

    async fn list_coupons(&self) -> Result<Vec<Coupon>, StoreError> {
        Ok(self.tables.read().await.coupons.clone())
    }

    async fn delete_coupon(&self, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.write().await;
        let before = t.coupons.len();
        t.coupons.retain(|c| c.id != id);
        Ok(t.coupons.len() < before)
    }
}
