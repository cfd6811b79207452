use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};
use storefront_cache::CacheKey;

use super::cached;
use crate::auth::AdminUser;
use crate::dashboard;
use crate::error::AppError;
use crate::state::AppState;

pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let stats = cached(&state, &CacheKey::AdminStats, || async {
        Ok::<_, AppError>(dashboard::stats(state.store.as_ref(), Utc::now()).await?)
    })
    .await?;

    Ok(Json(json!({ "success": true, "stats": stats })))
}

pub async fn pie(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let charts = cached(&state, &CacheKey::AdminPieChart, || async {
        Ok::<_, AppError>(dashboard::pie(state.store.as_ref(), Utc::now()).await?)
    })
    .await?;

    Ok(Json(json!({ "success": true, "charts": charts })))
}

pub async fn bar(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let charts = cached(&state, &CacheKey::AdminBarChart, || async {
        Ok::<_, AppError>(dashboard::bar(state.store.as_ref(), Utc::now()).await?)
    })
    .await?;

    Ok(Json(json!({ "success": true, "charts": charts })))
}

pub async fn line(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let charts = cached(&state, &CacheKey::AdminLineChart, || async {
        Ok::<_, AppError>(dashboard::line(state.store.as_ref(), Utc::now()).await?)
    })
    .await?;

    Ok(Json(json!({ "success": true, "charts": charts })))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{product_at, TestApp, ADMIN_ID, CUSTOMER_ID};
    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;
    use storefront_cache::CacheKey;

    #[tokio::test]
    async fn test_dashboard_requires_admin() {
        let app = TestApp::new().await;
        for chart in ["stats", "pie", "bar", "line"] {
            let (status, _) = app
                .get(&format!("/api/v1/dashboard/{chart}?id={CUSTOMER_ID}"))
                .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{chart}");
        }
    }

    #[tokio::test]
    async fn test_stats_are_cached_until_invalidated() {
        let app = TestApp::new().await;
        let path = format!("/api/v1/dashboard/stats?id={ADMIN_ID}");

        let (status, json) = app.get(&path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["stats"]["count"]["user"], 2);
        assert_eq!(json["stats"]["count"]["product"], 0);
        assert!(app.cache.has(&CacheKey::AdminStats));

        app.store
            .seed_product(product_at(1, "laptop", 3, Utc::now()))
            .await;

        // Served from cache, so the seeded product is not visible yet
        let (_, json) = app.get(&path).await;
        assert_eq!(json["stats"]["count"]["product"], 0);

        let (status, _) = app
            .send(
                "PUT",
                &format!("/api/v1/product/1?id={ADMIN_ID}"),
                Some(json!({ "stock": 2 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!app.cache.has(&CacheKey::AdminStats));

        let (_, json) = app.get(&path).await;
        assert_eq!(json["stats"]["count"]["product"], 1);
        assert_eq!(json["stats"]["categoryCount"]["laptop"], 100);
    }

    #[tokio::test]
    async fn test_chart_endpoints() {
        let app = TestApp::new().await;

        let (status, json) = app
            .get(&format!("/api/v1/dashboard/pie?id={ADMIN_ID}"))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["charts"]["adminCustomer"]["admin"], 1);
        assert_eq!(json["charts"]["adminCustomer"]["customer"], 1);

        let (_, json) = app
            .get(&format!("/api/v1/dashboard/bar?id={ADMIN_ID}"))
            .await;
        assert_eq!(json["charts"]["orders"].as_array().unwrap().len(), 12);
        assert_eq!(json["charts"]["users"].as_array().unwrap().len(), 6);

        let (_, json) = app
            .get(&format!("/api/v1/dashboard/line?id={ADMIN_ID}"))
            .await;
        assert_eq!(json["charts"]["revenue"].as_array().unwrap().len(), 12);
        assert!(app.cache.has(&CacheKey::AdminLineChart));
    }
}
