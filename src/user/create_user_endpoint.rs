use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};

use crate::{
    app_state::run_blocking,
    endpoints::{self, format_endpoint},
    models::UserName,
    stores::sqlite::SQLiteEngine,
    user::UserForm,
};

/// A route handler for registering a new user.
///
/// The user starts with a net worth of zero and an empty aggregate for the
/// current month.
pub async fn create_user_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Json(form): Json<UserForm>,
) -> Response {
    let user = run_blocking(engine, move |engine| {
        engine.register_user(UserName::new(&form.name)?)
    })
    .await;

    match user {
        Ok(user) => (
            StatusCode::CREATED,
            [(LOCATION, format_endpoint(endpoints::USER, user.id.as_i64()))],
            Json(user),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
