use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use storefront_cache::{CacheKey, InvalidationEvent};
use storefront_db::{Gender, NewUser, OrderFilter, User, UserFilter};
use storefront_stats::age_on;
use tracing::info;
use ts_rs::TS;

use crate::auth::AdminUser;
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::{is_valid_email, required_text};

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewUserRequest {
    #[serde(rename = "_id")]
    #[ts(optional)]
    id: Option<String>,
    #[ts(optional)]
    name: Option<String>,
    #[ts(optional)]
    email: Option<String>,
    #[ts(optional)]
    photo: Option<String>,
    #[ts(optional)]
    gender: Option<String>,
    #[ts(optional)]
    dob: Option<NaiveDate>,
}

/// User JSON with the derived `age`
fn user_json(user: &User, today: NaiveDate) -> Result<Value, AppError> {
    let mut value = serde_json::to_value(user).map_err(|e| AppError::Internal(e.to_string()))?;
    value["age"] = json!(age_on(user.dob, today));
    Ok(value)
}

/// Register a user, or greet one that already exists
pub async fn new_user(
    State(state): State<AppState>,
    Json(body): Json<NewUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    const MISSING: &str = "Please add all fields";

    if let Some(id) = body.id.as_deref().filter(|id| !id.is_empty()) {
        if let Some(existing) = state.store.get_user(id).await? {
            return Ok((
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "message": format!("Welcome, {}", existing.name),
                })),
            ));
        }
    }

    let id = required_text(body.id, MISSING)?;
    let name = required_text(body.name, MISSING)?;
    let email = required_text(body.email, MISSING)?;
    let photo = required_text(body.photo, MISSING)?;
    let gender: Gender = required_text(body.gender, MISSING)?
        .parse()
        .map_err(|_| AppError::BadRequest("Gender must be Male or Female".into()))?;
    let dob = body.dob.ok_or_else(|| AppError::BadRequest(MISSING.into()))?;

    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Please enter a valid email".into()));
    }

    let user = state
        .store
        .create_user(NewUser {
            id,
            name,
            email,
            photo,
            gender,
            dob,
        })
        .await?;

    state.cache.invalidate(&InvalidationEvent::default()).await;
    info!(user_id = %user.id, "Created user");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": format!("Welcome, {}", user.name),
        })),
    ))
}

pub async fn all_users(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let today = Utc::now().date_naive();
    let users = state
        .store
        .find_users(&UserFilter::default())
        .await?
        .iter()
        .map(|u| user_json(u, today))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(json!({ "success": true, "users": users })))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .store
        .get_user(&id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid Id".into()))?;

    Ok(Json(json!({
        "success": true,
        "user": user_json(&user, Utc::now().date_naive())?,
    })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let filter = OrderFilter {
        user: Some(id.clone()),
        ..OrderFilter::default()
    };
    let orders = state.store.find_orders(&filter, None).await?;

    if !state.store.delete_user(&id).await? {
        return Err(AppError::BadRequest("Invalid Id".into()));
    }

    // Populated order listings embed the user's name
    state
        .cache
        .invalidate(&InvalidationEvent::order(Some(id.clone()), None))
        .await;
    let order_keys: Vec<CacheKey> = orders.iter().map(|o| CacheKey::order(o.id)).collect();
    state.cache.delete(&order_keys).await;
    info!(user_id = %id, admin_id = %admin.id, "Deleted user");

    Ok(Json(json!({
        "success": true,
        "message": "User deleted successfully",
    })))
}
