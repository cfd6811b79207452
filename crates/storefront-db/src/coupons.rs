use crate::error::StoreError;
use crate::types::{Coupon, NewCoupon};
use sqlx::PgPool;

/// Create a coupon. Codes are unique.
pub async fn create(pool: &PgPool, c: &NewCoupon) -> Result<Coupon, StoreError> {
    sqlx::query_as::<_, Coupon>(
        r#"
        INSERT INTO coupons (code, amount)
        VALUES ($1, $2)
        RETURNING id, code, amount, created_at
        "#,
    )
    .bind(&c.code)
    .bind(c.amount)
    .fetch_one(pool)
    .await
    .map_err(|e| StoreError::conflict_or_database(e, "Coupon code already exists"))
}

/// Find a coupon by its code
pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Coupon>, sqlx::Error> {
    sqlx::query_as::<_, Coupon>("SELECT id, code, amount, created_at FROM coupons WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await
}

/// All coupons, oldest first
pub async fn list(pool: &PgPool) -> Result<Vec<Coupon>, sqlx::Error> {
    sqlx::query_as::<_, Coupon>("SELECT id, code, amount, created_at FROM coupons ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Delete a coupon, returning whether it existed
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM coupons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
