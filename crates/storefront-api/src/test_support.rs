//! Fixtures shared by the handler and dashboard tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use storefront_cache::KvCache;
use storefront_db::{
    Gender, MemoryStore, Order, OrderItem, OrderStatus, Product, Role, ShippingInfo, User,
};
use storefront_payments::{NewCustomer, PaymentProcessor};
use tower::ServiceExt;

use crate::config::Config;
use crate::router::create_router;
use crate::state::AppState;

pub const ADMIN_ID: &str = "admin-1";
pub const CUSTOMER_ID: &str = "customer-1";

/// Records calls instead of talking to a processor
#[derive(Default)]
pub struct FakePayments {
    pub intents: AtomicUsize,
}

#[async_trait]
impl PaymentProcessor for FakePayments {
    async fn create_customer(
        &self,
        customer: &NewCustomer,
    ) -> storefront_payments::Result<String> {
        Ok(format!("cus_{}", customer.name.replace(' ', "_")))
    }

    async fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        customer_id: &str,
    ) -> storefront_payments::Result<String> {
        self.intents.fetch_add(1, Ordering::SeqCst);
        Ok(format!("secret_{amount}_{currency}_{customer_id}"))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub cache: KvCache,
    pub payments: Arc<FakePayments>,
}

impl TestApp {
    /// App over an empty in-memory store holding one admin and one customer.
    pub async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let dob = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let mut admin = user_at(ADMIN_ID, dob, now);
        admin.role = Role::Admin;
        admin.email = "admin@example.com".into();
        store.seed_user(admin).await;
        store.seed_user(user_at(CUSTOMER_ID, dob, now)).await;

        let cache = KvCache::new();
        let payments = Arc::new(FakePayments::default());
        let state = AppState {
            store: store.clone(),
            cache: cache.clone(),
            payments: payments.clone(),
            product_per_page: config.product_per_page,
        };

        Self {
            router: create_router(state, &config),
            store,
            cache,
            payments,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }
}

pub fn product_at(id: i64, category: &str, stock: i64, created_at: DateTime<Utc>) -> Product {
    Product {
        id,
        name: format!("Product {id}"),
        photo: format!("uploads/{id}.png"),
        price: 100.0,
        stock,
        category: category.to_string(),
        created_at,
        updated_at: created_at,
    }
}

pub fn order_at(id: i64, user: &str, total: f64, created_at: DateTime<Utc>) -> Order {
    Order {
        id,
        shipping_info: ShippingInfo {
            address: "1 Main St".into(),
            city: "Pune".into(),
            state: "MH".into(),
            country: "India".into(),
            pin_code: 411001,
        },
        user: user.to_string(),
        sub_total: total,
        tax: 0.0,
        shipping_charges: 0.0,
        discount: 0.0,
        total,
        status: OrderStatus::Processing,
        order_items: vec![OrderItem {
            name: "Item".into(),
            photo: "uploads/item.png".into(),
            price: total,
            quantity: 1,
            product_id: 1,
        }],
        created_at,
        updated_at: created_at,
    }
}

pub fn user_at(id: &str, dob: NaiveDate, created_at: DateTime<Utc>) -> User {
    User {
        id: id.to_string(),
        name: format!("User {id}"),
        email: format!("{id}@example.com"),
        photo: "https://example.com/avatar.png".into(),
        role: Role::User,
        gender: Gender::Male,
        dob,
        created_at,
        updated_at: created_at,
    }
}
