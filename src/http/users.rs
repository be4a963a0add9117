//! Users resource handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::store::User;

/// Id returned by `POST /api/users` when no store is configured.
pub const PLACEHOLDER_USER_ID: i64 = 2;

const MISSING_FIELDS: &str = "name and email required";

/// Body of `POST /api/users`.
#[derive(Debug, Default, Deserialize)]
pub struct NewUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// `GET /api/users`
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let Some(store) = state.store.as_deref() else {
        return Ok(Json(Vec::new()));
    };

    let users = store.list_users().await?;
    Ok(Json(users))
}

/// `POST /api/users`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let NewUser { name, email } = match payload {
        Ok(Json(new_user)) => new_user,
        Err(rejection) => {
            tracing::debug!(reason = %rejection, "Rejected create-user body");
            return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
        }
    };

    if name.is_empty() || email.is_empty() {
        return Err(ApiError::Validation(MISSING_FIELDS.to_string()));
    }

    let user = match state.store.as_deref() {
        Some(store) => store.create_user(&name, &email).await?,
        None => User {
            id: PLACEHOLDER_USER_ID,
            name,
            email,
        },
    };

    Ok((StatusCode::CREATED, Json(user)))
}
