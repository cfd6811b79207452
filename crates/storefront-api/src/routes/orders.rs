use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::{json, Value};
use storefront_cache::{CacheKey, InvalidationEvent};
use storefront_db::{NewOrder, Order, OrderFilter, OrderItem, ShippingInfo, Store};
use tracing::{info, warn};
use ts_rs::TS;

use super::{cached, parse_id};
use crate::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::{required_positive, required_text};

const MISSING: &str = "Please enter all the fields";

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ShippingInfoBody {
    address: String,
    city: String,
    state: String,
    country: String,
    pin_code: i64,
}

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct OrderItemBody {
    name: String,
    photo: String,
    price: f64,
    quantity: i64,
    product_id: i64,
}

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewOrderRequest {
    #[ts(optional)]
    shipping_info: Option<ShippingInfoBody>,
    #[ts(optional)]
    order_items: Option<Vec<OrderItemBody>>,
    #[ts(optional)]
    user: Option<String>,
    #[ts(optional)]
    sub_total: Option<f64>,
    #[ts(optional)]
    tax: Option<f64>,
    #[ts(optional)]
    shipping_charges: Option<f64>,
    #[ts(optional)]
    discount: Option<f64>,
    #[ts(optional)]
    total: Option<f64>,
}

impl NewOrderRequest {
    fn validate(self) -> Result<NewOrder, AppError> {
        let missing = || AppError::BadRequest(MISSING.into());

        let info = self.shipping_info.ok_or_else(missing)?;
        let shipping_info = ShippingInfo {
            address: required_text(Some(info.address), MISSING)?,
            city: required_text(Some(info.city), MISSING)?,
            state: required_text(Some(info.state), MISSING)?,
            country: required_text(Some(info.country), MISSING)?,
            pin_code: info.pin_code,
        };

        let items = self.order_items.filter(|i| !i.is_empty()).ok_or_else(missing)?;
        if items.iter().any(|i| i.quantity <= 0) {
            return Err(AppError::BadRequest(
                "Order item quantity must be positive".into(),
            ));
        }
        let order_items = items
            .into_iter()
            .map(|i| OrderItem {
                name: i.name,
                photo: i.photo,
                price: i.price,
                quantity: i.quantity,
                product_id: i.product_id,
            })
            .collect();

        let tax = self.tax.filter(|t| *t >= 0.0).ok_or_else(missing)?;

        Ok(NewOrder {
            shipping_info,
            user: required_text(self.user, MISSING)?,
            sub_total: required_positive(self.sub_total, MISSING)?,
            tax,
            shipping_charges: self.shipping_charges.unwrap_or(0.0),
            discount: self.discount.unwrap_or(0.0),
            total: required_positive(self.total, MISSING)?,
            order_items,
        })
    }
}

#[derive(Deserialize)]
pub struct MyOrdersQuery {
    id: Option<String>,
}

/// Decrement stock for every line item concurrently. Fails if any product is
/// missing; decrements already applied stay applied.
async fn reduce_stock(store: &dyn Store, items: &[OrderItem]) -> Result<(), AppError> {
    let found = try_join_all(
        items
            .iter()
            .map(|item| store.decrement_stock(item.product_id, item.quantity)),
    )
    .await?;

    if found.iter().all(|f| *f) {
        Ok(())
    } else {
        Err(AppError::NotFound("Product not found.".into()))
    }
}

/// Order JSON with `user` replaced by `{ _id, name }`, or null when the user
/// no longer exists
async fn with_user_names(store: &dyn Store, orders: Vec<Order>) -> Result<Vec<Value>, AppError> {
    let ids: Vec<String> = orders
        .iter()
        .map(|o| o.user.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let names = store.user_names(&ids).await?;

    orders
        .into_iter()
        .map(|order| {
            let user = names
                .get(&order.user)
                .map(|name| json!({ "_id": order.user, "name": name }))
                .unwrap_or(Value::Null);
            let mut value =
                serde_json::to_value(&order).map_err(|e| AppError::Internal(e.to_string()))?;
            value["user"] = user;
            Ok(value)
        })
        .collect()
}

pub async fn new_order(
    State(state): State<AppState>,
    Json(body): Json<NewOrderRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let new_order = body.validate()?;
    let order = state.store.create_order(new_order).await?;

    let stock = reduce_stock(state.store.as_ref(), &order.order_items).await;

    // The order row exists either way, so its listings are stale either way.
    let event = InvalidationEvent::order(Some(order.user.clone()), None)
        .with_products(order.order_items.iter().map(|i| i.product_id));
    state.cache.invalidate(&event).await;

    if let Err(e) = stock {
        warn!(order_id = order.id, "Stock reduction failed for new order");
        return Err(e);
    }
    info!(order_id = order.id, user_id = %order.user, "Placed order");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Order placed successfully.",
        })),
    ))
}

pub async fn my_orders(
    State(state): State<AppState>,
    Query(query): Query<MyOrdersQuery>,
) -> Result<Json<Value>, AppError> {
    let user = query
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Please log in first".into()))?;

    let orders: Vec<Order> = cached(&state, &CacheKey::my_orders(&user), || async {
        let filter = OrderFilter {
            user: Some(user.clone()),
            ..OrderFilter::default()
        };
        Ok::<_, AppError>(state.store.find_orders(&filter, None).await?)
    })
    .await?;

    Ok(Json(json!({ "success": true, "orders": orders })))
}

pub async fn all_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let orders: Vec<Value> = cached(&state, &CacheKey::AllOrders, || async {
        let orders = state
            .store
            .find_orders(&OrderFilter::default(), None)
            .await?;
        with_user_names(state.store.as_ref(), orders).await
    })
    .await?;

    Ok(Json(json!({ "success": true, "orders": orders })))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let order: Value = cached(&state, &CacheKey::order(id), || async {
        let order = state
            .store
            .get_order(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found.".into()))?;
        let mut populated = with_user_names(state.store.as_ref(), vec![order]).await?;
        Ok::<_, AppError>(populated.remove(0))
    })
    .await?;

    Ok(Json(json!({ "success": true, "order": order })))
}

/// Advance an order to its next status
pub async fn process_order(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let order = state
        .store
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order does not exist".into()))?;

    let status = order.status.advance();
    state.store.set_order_status(id, status).await?;
    state
        .cache
        .invalidate(&InvalidationEvent::order(
            Some(order.user),
            Some(id.to_string()),
        ))
        .await;
    info!(order_id = id, status = %status, admin_id = %admin.id, "Processed order");

    Ok(Json(json!({
        "success": true,
        "message": "Order processed successfully.",
    })))
}

pub async fn delete_order(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let order = state
        .store
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    state.store.delete_order(id).await?;
    state
        .cache
        .invalidate(&InvalidationEvent::order(
            Some(order.user),
            Some(id.to_string()),
        ))
        .await;

    Ok(Json(json!({
        "success": true,
        "message": "Order deleted successfully.",
    })))
}
