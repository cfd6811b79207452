use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use storefront_cache::CacheKey;
use storefront_db::{Coupon, NewCoupon};
use storefront_payments::{Address, NewCustomer};
use tracing::info;
use ts_rs::TS;

use super::{cached, parse_id};
use crate::auth::AdminUser;
use crate::constants::{
    DEFAULT_CUSTOMER_CITY, DEFAULT_CUSTOMER_COUNTRY, DEFAULT_CUSTOMER_EMAIL,
    DEFAULT_CUSTOMER_LINE1, DEFAULT_CUSTOMER_NAME, DEFAULT_CUSTOMER_POSTAL_CODE,
    DEFAULT_CUSTOMER_STATE, PAYMENT_CURRENCY,
};
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::{required_positive, required_text};

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewCouponRequest {
    #[ts(optional)]
    code: Option<String>,
    #[ts(optional)]
    amount: Option<f64>,
}

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PaymentIntentRequest {
    /// Amount in rupees
    #[ts(optional)]
    amount: Option<f64>,
}

#[derive(Deserialize)]
pub struct DiscountQuery {
    coupon: Option<String>,
}

fn default_customer() -> NewCustomer {
    NewCustomer {
        name: DEFAULT_CUSTOMER_NAME.to_string(),
        email: DEFAULT_CUSTOMER_EMAIL.to_string(),
        address: Address {
            line1: DEFAULT_CUSTOMER_LINE1.to_string(),
            city: DEFAULT_CUSTOMER_CITY.to_string(),
            state: DEFAULT_CUSTOMER_STATE.to_string(),
            postal_code: DEFAULT_CUSTOMER_POSTAL_CODE.to_string(),
            country: DEFAULT_CUSTOMER_COUNTRY.to_string(),
        },
    }
}

pub async fn new_coupon(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(body): Json<NewCouponRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    const MISSING: &str = "Please enter both fields";

    let code = required_text(body.code, MISSING)?;
    let amount = required_positive(body.amount, MISSING)?;

    let coupon = state.store.create_coupon(NewCoupon { code, amount }).await?;
    state.cache.delete([&CacheKey::AllCoupons]).await;
    info!(code = %coupon.code, admin_id = %admin.id, "Created coupon");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("Coupon {} created successfully.", coupon.code),
        })),
    ))
}

pub async fn apply_discount(
    State(state): State<AppState>,
    Query(query): Query<DiscountQuery>,
) -> Result<Json<Value>, AppError> {
    let invalid = || AppError::BadRequest("Please enter a valid coupon code.".into());

    let code = query.coupon.filter(|c| !c.is_empty()).ok_or_else(invalid)?;
    let coupon = state
        .store
        .find_coupon(&code)
        .await?
        .ok_or_else(invalid)?;

    Ok(Json(json!({ "success": true, "discount": coupon.amount })))
}

pub async fn all_coupons(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let coupons: Vec<Coupon> = cached(&state, &CacheKey::AllCoupons, || async {
        Ok::<_, AppError>(state.store.list_coupons().await?)
    })
    .await?;

    Ok(Json(json!({ "success": true, "coupons": coupons })))
}

pub async fn delete_coupon(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    if !state.store.delete_coupon(id).await? {
        return Err(AppError::BadRequest("Coupon does not exist".into()));
    }
    state.cache.delete([&CacheKey::AllCoupons]).await;

    Ok(Json(json!({
        "success": true,
        "message": "Coupon deleted successfully.",
    })))
}

/// Register a placeholder customer and open a payment intent for it
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(body): Json<PaymentIntentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let amount = required_positive(body.amount, "Please enter the amount")?;
    let minor_units = (amount * 100.0).round() as i64;

    let customer_id = state.payments.create_customer(&default_customer()).await?;
    let client_secret = state
        .payments
        .create_payment_intent(minor_units, PAYMENT_CURRENCY, &customer_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "clientSecret": client_secret })),
    ))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{TestApp, ADMIN_ID};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use storefront_cache::CacheKey;

    #[tokio::test]
    async fn test_coupon_lifecycle() {
        let app = TestApp::new().await;
        let all = format!("/api/v1/payment/coupon/all?id={ADMIN_ID}");

        let (_, json) = app.get(&all).await;
        assert_eq!(json["coupons"], json!([]));
        assert!(app.cache.has(&CacheKey::AllCoupons));

        let (status, json) = app
            .send(
                "POST",
                &format!("/api/v1/payment/coupon/new?id={ADMIN_ID}"),
                Some(json!({ "code": "SAVE10", "amount": 10 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["message"], "Coupon SAVE10 created successfully.");
        assert!(!app.cache.has(&CacheKey::AllCoupons));

        let (status, json) = app.get("/api/v1/payment/discount?coupon=SAVE10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["discount"], 10.0);

        let (status, json) = app.get("/api/v1/payment/discount?coupon=NOPE").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Please enter a valid coupon code.");

        let (_, json) = app.get(&all).await;
        let id = json["coupons"][0]["_id"].as_i64().unwrap();

        let delete = format!("/api/v1/payment/coupon/{id}?id={ADMIN_ID}");
        let (status, _) = app.send("DELETE", &delete, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!app.cache.has(&CacheKey::AllCoupons));

        let (status, json) = app.send("DELETE", &delete, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Coupon does not exist");
    }

    #[tokio::test]
    async fn test_duplicate_coupon_code() {
        let app = TestApp::new().await;
        let path = format!("/api/v1/payment/coupon/new?id={ADMIN_ID}");
        let body = json!({ "code": "SAVE10", "amount": 10 });

        app.send("POST", &path, Some(body.clone())).await;
        let (status, json) = app.send("POST", &path, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Coupon code already exists");
    }

    #[tokio::test]
    async fn test_coupon_requires_both_fields() {
        let app = TestApp::new().await;
        let (status, json) = app
            .send(
                "POST",
                &format!("/api/v1/payment/coupon/new?id={ADMIN_ID}"),
                Some(json!({ "code": "SAVE10" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Please enter both fields");
    }

    #[tokio::test]
    async fn test_create_payment_intent() {
        let app = TestApp::new().await;

        let (status, json) = app
            .send(
                "POST",
                "/api/v1/payment/create",
                Some(json!({ "amount": 123.45 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["clientSecret"], "secret_12345_inr_cus_Default_Name");
        assert_eq!(app.payments.intents.load(Ordering::SeqCst), 1);

        let (status, json) = app
            .send("POST", "/api/v1/payment/create", Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Please enter the amount");
        assert_eq!(app.payments.intents.load(Ordering::SeqCst), 1);
    }
}
