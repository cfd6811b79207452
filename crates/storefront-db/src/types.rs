use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::error::StoreError;

// --- Products ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: i64,
    pub name: String,
    pub photo: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub photo: String,
    pub price: f64,
    pub stock: i64,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
    pub max_price: Option<f64>,
    pub category: Option<String>,
    /// Only products with zero stock
    pub out_of_stock: bool,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl ProductFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, p: &Product) -> bool {
        self.search
            .as_ref()
            .map_or(true, |s| p.name.to_lowercase().contains(&s.to_lowercase()))
            && self.max_price.map_or(true, |max| p.price <= max)
            && self.category.as_ref().map_or(true, |c| &p.category == c)
            && (!self.out_of_stock || p.stock == 0)
            && created_within(p.created_at, self.created_after, self.created_before)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    /// Insertion order
    #[default]
    Unsorted,
    Newest,
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductPage {
    pub sort: ProductSort,
    pub limit: Option<i64>,
    pub offset: i64,
}

// --- Orders ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Processing,
    Shipped,
    /// Spelled `Delievered` on the wire, which the storefront frontend expects
    #[serde(rename = "Delievered")]
    Delivered,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
        }
    }

    /// Next fulfillment step. Delivered orders stay delivered.
    pub fn advance(self) -> Self {
        match self {
            Self::Processing => Self::Shipped,
            Self::Shipped | Self::Delivered => Self::Delivered,
        }
    }
}

impl FromStr for OrderStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            other => Err(StoreError::Decode(format!("unknown order status: {other}"))),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub photo: String,
    pub price: f64,
    pub quantity: i64,
    pub product_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: i64,
    pub shipping_info: ShippingInfo,
    /// Id of the ordering user
    pub user: String,
    pub sub_total: f64,
    pub tax: f64,
    pub shipping_charges: f64,
    pub discount: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub order_items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub shipping_info: ShippingInfo,
    pub user: String,
    pub sub_total: f64,
    pub tax: f64,
    pub shipping_charges: f64,
    pub discount: f64,
    pub total: f64,
    pub order_items: Vec<OrderItem>,
}

/// Order row as stored; JSONB columns still wrapped
#[derive(Debug, FromRow)]
pub(crate) struct OrderRecord {
    pub id: i64,
    pub shipping_info: Json<ShippingInfo>,
    pub user_id: String,
    pub sub_total: f64,
    pub tax: f64,
    pub shipping_charges: f64,
    pub discount: f64,
    pub total: f64,
    pub status: String,
    pub order_items: Json<Vec<OrderItem>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = StoreError;

    fn try_from(r: OrderRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            shipping_info: r.shipping_info.0,
            user: r.user_id,
            sub_total: r.sub_total,
            tax: r.tax,
            shipping_charges: r.shipping_charges,
            discount: r.discount,
            total: r.total,
            status: r.status.parse()?,
            order_items: r.order_items.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub user: Option<String>,
    pub status: Option<OrderStatus>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl OrderFilter {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, o: &Order) -> bool {
        self.user.as_ref().map_or(true, |u| &o.user == u)
            && self.status.map_or(true, |s| o.status == s)
            && created_within(o.created_at, self.created_after, self.created_before)
    }
}

// --- Users ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(StoreError::Decode(format!("unknown role: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            other => Err(StoreError::Decode(format!("unknown gender: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub role: Role,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub gender: Gender,
    pub dob: NaiveDate,
}

#[derive(Debug, FromRow)]
pub(crate) struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo: String,
    pub role: String,
    pub gender: String,
    pub dob: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = StoreError;

    fn try_from(r: UserRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            name: r.name,
            email: r.email,
            photo: r.photo,
            role: r.role.parse()?,
            gender: r.gender.parse()?,
            dob: r.dob,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub gender: Option<Gender>,
    pub role: Option<Role>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl UserFilter {
    pub fn gender(gender: Gender) -> Self {
        Self {
            gender: Some(gender),
            ..Self::default()
        }
    }

    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    pub fn matches(&self, u: &User) -> bool {
        self.gender.map_or(true, |g| u.gender == g)
            && self.role.map_or(true, |r| u.role == r)
            && created_within(u.created_at, self.created_after, self.created_before)
    }
}

// --- Coupons ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    #[serde(rename = "_id")]
    pub id: i64,
    pub code: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub amount: f64,
}

/// `after` is inclusive, `before` exclusive.
fn created_within(
    created_at: DateTime<Utc>,
    after: Option<DateTime<Utc>>,
    before: Option<DateTime<Utc>>,
) -> bool {
    after.map_or(true, |a| created_at >= a) && before.map_or(true, |b| created_at < b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn product(name: &str, price: f64, stock: i64, category: &str) -> Product {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        Product {
            id: 1,
            name: name.to_string(),
            photo: "uploads/p.png".to_string(),
            price,
            stock,
            category: category.to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_product_filter_search_is_case_insensitive() {
        let filter = ProductFilter {
            search: Some("MAC".into()),
            ..Default::default()
        };
        assert!(filter.matches(&product("MacBook Air", 999.0, 3, "laptop")));
        assert!(!filter.matches(&product("ThinkPad", 899.0, 3, "laptop")));
    }

    #[test]
    fn test_product_filter_combines_conditions() {
        let filter = ProductFilter {
            max_price: Some(500.0),
            category: Some("phone".into()),
            ..Default::default()
        };
        assert!(filter.matches(&product("Pixel", 499.0, 1, "phone")));
        assert!(!filter.matches(&product("Pixel Pro", 899.0, 1, "phone")));
        assert!(!filter.matches(&product("Kindle", 99.0, 1, "reader")));
    }

    #[test]
    fn test_out_of_stock_filter() {
        let filter = ProductFilter {
            out_of_stock: true,
            ..Default::default()
        };
        assert!(filter.matches(&product("a", 1.0, 0, "x")));
        assert!(!filter.matches(&product("b", 1.0, 2, "x")));
    }

    #[test]
    fn test_created_range_is_half_open() {
        let p = product("a", 1.0, 1, "x");
        let filter = ProductFilter {
            created_after: Some(p.created_at),
            created_before: Some(p.created_at + chrono::Duration::days(1)),
            ..Default::default()
        };
        assert!(filter.matches(&p));

        let filter = ProductFilter {
            created_before: Some(p.created_at),
            ..Default::default()
        };
        assert!(!filter.matches(&p));
    }

    #[test]
    fn test_order_status_advance() {
        assert_eq!(OrderStatus::Processing.advance(), OrderStatus::Shipped);
        assert_eq!(OrderStatus::Shipped.advance(), OrderStatus::Delivered);
        assert_eq!(OrderStatus::Delivered.advance(), OrderStatus::Delivered);
    }

    #[test]
    fn test_order_status_wire_spelling() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivered).unwrap(),
            "\"Delievered\""
        );
        assert_eq!("Delivered".parse::<OrderStatus>().unwrap(), OrderStatus::Delivered);
        assert!("Delievered".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_product_serializes_mongo_style_id() {
        let json = serde_json::to_value(product("a", 1.0, 1, "x")).unwrap();
        assert_eq!(json["_id"], 1);
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_role_round_trip_from_column() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("owner".parse::<Role>().is_err());
    }
}
