use crate::types::{NewProduct, Product, ProductFilter, ProductPage, ProductSort};
use sqlx::{PgPool, Postgres, QueryBuilder};

const PRODUCT_COLUMNS: &str =
    "id, name, photo, price, stock, category, created_at, updated_at";

/// Insert a product and return the stored row
pub async fn create(pool: &PgPool, p: &NewProduct) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, photo, price, stock, category)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, photo, price, stock, category, created_at, updated_at
        "#,
    )
    .bind(&p.name)
    .bind(&p.photo)
    .bind(p.price)
    .bind(p.stock)
    .bind(&p.category)
    .fetch_one(pool)
    .await
}

/// Get a product by id
pub async fn get(pool: &PgPool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Overwrite the editable fields of a product
pub async fn update(pool: &PgPool, p: &Product) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE products
        SET name = $2, photo = $3, price = $4, stock = $5, category = $6, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(p.id)
    .bind(&p.name)
    .bind(&p.photo)
    .bind(p.price)
    .bind(p.stock)
    .bind(&p.category)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a product, returning whether it existed
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Find products matching a filter, sorted and paged
pub async fn find(
    pool: &PgPool,
    filter: &ProductFilter,
    page: &ProductPage,
) -> Result<Vec<Product>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"
    ));
    push_filter(&mut qb, filter);

    qb.push(match page.sort {
        ProductSort::Unsorted => " ORDER BY id",
        ProductSort::Newest => " ORDER BY created_at DESC, id DESC",
        ProductSort::PriceAsc => " ORDER BY price ASC, id",
        ProductSort::PriceDesc => " ORDER BY price DESC, id",
    });

    if let Some(limit) = page.limit {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
    }
    if page.offset > 0 {
        qb.push(" OFFSET ");
        qb.push_bind(page.offset);
    }

    qb.build_query_as::<Product>().fetch_all(pool).await
}

/// Count products matching a filter
pub async fn count(pool: &PgPool, filter: &ProductFilter) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products WHERE TRUE");
    push_filter(&mut qb, filter);
    let (count,): (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(count)
}

/// Distinct product categories in alphabetical order
pub async fn categories(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> =
        sqlx::query_as("SELECT DISTINCT category FROM products ORDER BY category")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Subtract from a product's stock, returning whether the product exists
pub async fn decrement_stock(pool: &PgPool, id: i64, quantity: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE products SET stock = stock - $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(quantity)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    if let Some(ref search) = filter.search {
        qb.push(" AND name ILIKE ");
        qb.push_bind(format!("%{}%", escape_like(search)));
    }
    if let Some(max_price) = filter.max_price {
        qb.push(" AND price <= ");
        qb.push_bind(max_price);
    }
    if let Some(ref category) = filter.category {
        qb.push(" AND category = ");
        qb.push_bind(category.clone());
    }
    if filter.out_of_stock {
        qb.push(" AND stock = 0");
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

/// Escape LIKE wildcards so a search term matches literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
