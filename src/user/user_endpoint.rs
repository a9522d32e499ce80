//! Defines the endpoints for reading, renaming and deleting a single user.
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    app_state::run_blocking,
    models::{UserID, UserName},
    stores::{UserStore, sqlite::SQLiteEngine},
    user::UserForm,
};

/// A route handler for getting a user and their current net worth.
pub async fn get_user_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Path(user_id): Path<UserID>,
) -> Response {
    match engine.user_store().get(user_id) {
        Ok(user) => Json(user).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for changing a user's name.
pub async fn update_user_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Path(user_id): Path<UserID>,
    Json(form): Json<UserForm>,
) -> Response {
    let user = UserName::new(&form.name)
        .and_then(|name| engine.user_store().update_name(user_id, name));

    match user {
        Ok(user) => Json(user).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for deleting a user along with their transactions and
/// aggregates, responds with 204 No Content on success.
pub async fn delete_user_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Path(user_id): Path<UserID>,
) -> Response {
    match run_blocking(engine, move |engine| engine.delete_user(user_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}
