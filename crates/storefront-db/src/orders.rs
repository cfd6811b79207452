use crate::error::StoreError;
use crate::types::{NewOrder, Order, OrderFilter, OrderRecord, OrderStatus};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

const ORDER_COLUMNS: &str = r#"
    id, shipping_info, user_id, sub_total, tax, shipping_charges, discount, total,
    status, order_items, created_at, updated_at
"#;

/// Insert an order in the Processing state
pub async fn create(pool: &PgPool, o: &NewOrder) -> Result<Order, StoreError> {
    let record = sqlx::query_as::<_, OrderRecord>(&format!(
        r#"
        INSERT INTO orders (
            shipping_info, user_id, sub_total, tax, shipping_charges, discount, total,
            status, order_items
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {ORDER_COLUMNS}
        "#
    ))
    .bind(Json(&o.shipping_info))
    .bind(&o.user)
    .bind(o.sub_total)
    .bind(o.tax)
    .bind(o.shipping_charges)
    .bind(o.discount)
    .bind(o.total)
    .bind(OrderStatus::Processing.as_str())
    .bind(Json(&o.order_items))
    .fetch_one(pool)
    .await?;
    record.try_into()
}

/// Get an order by id
pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Order>, StoreError> {
    let record = sqlx::query_as::<_, OrderRecord>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    record.map(Order::try_from).transpose()
}

/// Find orders matching a filter, newest first
pub async fn find(
    pool: &PgPool,
    filter: &OrderFilter,
    limit: Option<i64>,
) -> Result<Vec<Order>, StoreError> {
    let mut qb =
        QueryBuilder::<Postgres>::new(format!("SELECT {ORDER_COLUMNS} FROM orders WHERE TRUE"));
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY created_at DESC, id DESC");
    if let Some(limit) = limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }

    let records = qb.build_query_as::<OrderRecord>().fetch_all(pool).await?;
    records.into_iter().map(Order::try_from).collect()
}

/// Count orders matching a filter
pub async fn count(pool: &PgPool, filter: &OrderFilter) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders WHERE TRUE");
    push_filter(&mut qb, filter);
    let (count,): (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(count)
}

/// Set the fulfillment status of an order
pub async fn set_status(pool: &PgPool, id: i64, status: OrderStatus) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1")
        .bind(id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete an order, returning whether it existed
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
    if let Some(ref user) = filter.user {
        qb.push(" AND user_id = ");
        qb.push_bind(user.clone());
    }
    if let Some(status) = filter.status {
        qb.push(" AND status = ");
        qb.push_bind(status.as_str());
    }
    if let Some(after) = filter.created_after {
        qb.push(" AND created_at >= ");
        qb.push_bind(after);
    }
    if let Some(before) = filter.created_before {
        qb.push(" AND created_at < ");
        qb.push_bind(before);
    }
}
