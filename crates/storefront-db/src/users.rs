use std::collections::HashMap;

use crate::error::StoreError;
use crate::types::{NewUser, Role, User, UserFilter, UserRecord};
use sqlx::{PgPool, Postgres, QueryBuilder};

const USER_COLUMNS: &str = "id, name, email, photo, role, gender, dob, created_at, updated_at";

/// Insert a user with the default role
pub async fn create(pool: &PgPool, u: &NewUser) -> Result<User, StoreError> {
    let record = sqlx::query_as::<_, UserRecord>(&format!(
        r#"
        INSERT INTO users (id, name, email, photo, role, gender, dob)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&u.id)
    .bind(&u.name)
    .bind(&u.email)
    .bind(&u.photo)
    .bind(Role::default().as_str())
    .bind(u.gender.as_str())
    .bind(u.dob)
    .fetch_one(pool)
    .await
    .map_err(|e| StoreError::conflict_or_database(e, "User already exists"))?;
    record.try_into()
}

/// Get a user by id
pub async fn get(pool: &PgPool, id: &str) -> Result<Option<User>, StoreError> {
    let record = sqlx::query_as::<_, UserRecord>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    record.map(User::try_from).transpose()
}

/// Find users matching a filter, oldest first
pub async fn find(pool: &PgPool, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
    let mut qb =
        QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users WHERE TRUE"));
    push_filter(&mut qb, filter);
    qb.push(" ORDER BY created_at, id");

    let records = qb.build_query_as::<UserRecord>().fetch_all(pool).await?;
    records.into_iter().map(User::try_from).collect()
}

/// Count users matching a filter
pub async fn count(pool: &PgPool, filter: &UserFilter) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE TRUE");
    push_filter(&mut qb, filter);
    let (count,): (i64,) = qb.build_query_as().fetch_one(pool).await?;
    Ok(count)
}

/// Look up display names for a batch of user ids
pub async fn names(pool: &PgPool, ids: &[String]) -> Result<HashMap<String, String>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT id, name FROM users WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Delete a user, returning whether it existed
pub async fn delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
    if let Some(gender) = filter.gender {
        qb.push(" AND gender = ");
        qb.push_bind(gender.as_str());
    }
    if let Some(role) = filter.role {
        qb.push(" AND role = ");
        qb.push_bind(role.as_str());
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
