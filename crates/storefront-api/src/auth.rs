use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use storefront_db::{Role, User};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
struct IdentityQuery {
    id: Option<String>,
}

/// An admin identified by the `?id=` query parameter.
///
/// Use this as a handler parameter to restrict a route to admins:
///
/// ```ignore
/// async fn my_handler(_admin: AdminUser, ...) -> Result<..., AppError> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let id = Query::<IdentityQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Please log in first".into()))?;

        let user = state
            .store
            .get_user(&id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User does not exist".into()))?;

        if user.role != Role::Admin {
            return Err(AppError::Unauthorized(
                "You are not authorized to perform this action".into(),
            ));
        }

        Ok(AdminUser(user))
    }
}
