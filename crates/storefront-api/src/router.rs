use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::routes;
use crate::state::AppState;

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    }
}

/// Create the HTTP router
pub fn create_router(state: AppState, config: &Config) -> Router {
    let user = Router::new()
        .route("/new", post(routes::users::new_user))
        .route("/all", get(routes::users::all_users))
        .route(
            "/{id}",
            get(routes::users::get_user).delete(routes::users::delete_user),
        );

    // Specific routes before `/{id}`
    let product = Router::new()
        .route("/new", post(routes::products::new_product))
        .route("/latest", get(routes::products::latest_products))
        .route("/categories", get(routes::products::categories))
        .route("/admin-products", get(routes::products::admin_products))
        .route("/all", get(routes::products::search_products))
        .route(
            "/{id}",
            get(routes::products::get_product)
                .put(routes::products::update_product)
                .delete(routes::products::delete_product),
        );

    let order = Router::new()
        .route("/new", post(routes::orders::new_order))
        .route("/my", get(routes::orders::my_orders))
        .route("/all", get(routes::orders::all_orders))
        .route(
            "/{id}",
            get(routes::orders::get_order)
                .put(routes::orders::process_order)
                .delete(routes::orders::delete_order),
        );

    let payment = Router::new()
        .route("/coupon/new", post(routes::payment::new_coupon))
        .route("/discount", get(routes::payment::apply_discount))
        .route("/coupon/all", get(routes::payment::all_coupons))
        .route(
            "/coupon/{id}",
            axum::routing::delete(routes::payment::delete_coupon),
        )
        .route("/create", post(routes::payment::create_payment_intent));

    let dashboard = Router::new()
        .route("/stats", get(routes::dashboard::stats))
        .route("/pie", get(routes::dashboard::pie))
        .route("/bar", get(routes::dashboard::bar))
        .route("/line", get(routes::dashboard::line));

    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        .nest("/api/v1/user", user)
        .nest("/api/v1/product", product)
        .nest("/api/v1/order", order)
        .nest("/api/v1/payment", payment)
        .nest("/api/v1/dashboard", dashboard)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(state)
}
