use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use storefront_cache::{CacheKey, InvalidationEvent};
use storefront_db::{NewProduct, Product, ProductFilter, ProductPage, ProductSort};
use tracing::info;
use ts_rs::TS;

use super::{cached, parse_id};
use crate::auth::AdminUser;
use crate::constants::LATEST_PRODUCTS_LIMIT;
use crate::error::AppError;
use crate::state::AppState;
use crate::validation::{lenient_number, required_positive, required_text};

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct NewProductRequest {
    #[ts(optional)]
    name: Option<String>,
    /// Path or URL of an already stored image
    #[ts(optional)]
    photo: Option<String>,
    #[ts(optional)]
    price: Option<f64>,
    #[ts(optional)]
    stock: Option<i64>,
    #[ts(optional)]
    category: Option<String>,
}

#[derive(Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct UpdateProductRequest {
    #[ts(optional)]
    name: Option<String>,
    #[ts(optional)]
    photo: Option<String>,
    #[ts(optional)]
    price: Option<f64>,
    #[ts(optional)]
    stock: Option<i64>,
    #[ts(optional)]
    category: Option<String>,
}

/// Search parameters arrive as raw strings; blank or malformed numbers are
/// ignored rather than rejected.
#[derive(Deserialize)]
pub struct SearchQuery {
    search: Option<String>,
    sort: Option<String>,
    price: Option<String>,
    category: Option<String>,
    page: Option<String>,
}

fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

pub async fn new_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(body): Json<NewProductRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    const MISSING: &str = "Please enter all fields.";

    let photo = required_text(body.photo, "Please upload the image.")?;
    let name = required_text(body.name, MISSING)?;
    let price = required_positive(body.price, MISSING)?;
    let stock = body
        .stock
        .filter(|s| *s > 0)
        .ok_or_else(|| AppError::BadRequest(MISSING.into()))?;
    let category = normalize_category(&required_text(body.category, MISSING)?);

    let product = state
        .store
        .create_product(NewProduct {
            name,
            photo,
            price,
            stock,
            category,
        })
        .await?;

    state
        .cache
        .invalidate(&InvalidationEvent {
            product: true,
            ..InvalidationEvent::default()
        })
        .await;
    info!(product_id = product.id, admin_id = %admin.id, "Created product");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Product created successfully.",
        })),
    ))
}

pub async fn latest_products(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let products: Vec<Product> = cached(&state, &CacheKey::LatestProducts, || async {
        let page = ProductPage {
            sort: ProductSort::Newest,
            limit: Some(LATEST_PRODUCTS_LIMIT),
            offset: 0,
        };
        Ok::<_, AppError>(
            state
                .store
                .find_products(&ProductFilter::default(), &page)
                .await?,
        )
    })
    .await?;

    Ok(Json(json!({ "success": true, "products": products })))
}

pub async fn categories(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let categories: Vec<String> = cached(&state, &CacheKey::Categories, || async {
        Ok::<_, AppError>(state.store.product_categories().await?)
    })
    .await?;

    Ok(Json(json!({ "success": true, "categories": categories })))
}

pub async fn admin_products(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Value>, AppError> {
    let products: Vec<Product> = cached(&state, &CacheKey::AllProducts, || async {
        Ok::<_, AppError>(
            state
                .store
                .find_products(&ProductFilter::default(), &ProductPage::default())
                .await?,
        )
    })
    .await?;

    Ok(Json(json!({ "success": true, "products": products })))
}

/// Paged product search. Not cached: the parameter space is unbounded.
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let per_page = state.product_per_page;
    let page = lenient_number::<i64>(query.page.as_deref())
        .filter(|p| *p >= 1)
        .unwrap_or(1);

    let filter = ProductFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        max_price: lenient_number(query.price.as_deref()),
        category: query
            .category
            .filter(|c| !c.trim().is_empty())
            .map(|c| normalize_category(&c)),
        ..ProductFilter::default()
    };
    let sort = match query.sort.as_deref().map(str::trim) {
        None | Some("") => ProductSort::Unsorted,
        Some("asc") => ProductSort::PriceAsc,
        Some(_) => ProductSort::PriceDesc,
    };
    let paging = ProductPage {
        sort,
        limit: Some(per_page),
        // Huge page numbers saturate past the last row instead of overflowing
        offset: (page - 1).saturating_mul(per_page),
    };

    let (products, total) = tokio::try_join!(
        state.store.find_products(&filter, &paging),
        state.store.count_products(&filter),
    )?;
    let total_page = (total + per_page - 1) / per_page;

    Ok(Json(json!({
        "success": true,
        "products": products,
        "totalPage": total_page,
    })))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let product: Product = cached(&state, &CacheKey::product(id), || async {
        state
            .store
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product does not exist.".into()))
    })
    .await?;

    Ok(Json(json!({ "success": true, "product": product })))
}

pub async fn update_product(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    let mut product = state
        .store
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found.".into()))?;

    if let Some(name) = body.name.filter(|n| !n.trim().is_empty()) {
        product.name = name.trim().to_string();
    }
    if let Some(photo) = body.photo.filter(|p| !p.trim().is_empty()) {
        product.photo = photo;
    }
    if let Some(price) = body.price {
        product.price = required_positive(Some(price), "Price must be positive")?;
    }
    if let Some(stock) = body.stock {
        if stock < 0 {
            return Err(AppError::BadRequest("Stock cannot be negative".into()));
        }
        product.stock = stock;
    }
    if let Some(category) = body.category.filter(|c| !c.trim().is_empty()) {
        product.category = normalize_category(&category);
    }

    state.store.update_product(&product).await?;
    state
        .cache
        .invalidate(&InvalidationEvent::product([product.id]))
        .await;

    Ok(Json(json!({
        "success": true,
        "message": "Product updated successfully.",
    })))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    if !state.store.delete_product(id).await? {
        return Err(AppError::NotFound("Product does not exist.".into()));
    }

    state
        .cache
        .invalidate(&InvalidationEvent::product([id]))
        .await;
    info!(product_id = id, admin_id = %admin.id, "Deleted product");

    Ok(Json(json!({
        "success": true,
        "message": "Product deleted successfully.",
    })))
}
