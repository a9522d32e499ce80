//! Defines the endpoints for a user's monthly aggregates.
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    app_state::run_blocking,
    models::UserID,
    stores::{AggregateStore, UserStore, sqlite::SQLiteEngine},
};

/// A route handler for the current month's aggregate, the previous month's
/// aggregate (or `null`) and the user.
///
/// Responds with 500 if the current month cannot be found even after
/// reconciling the user.
pub async fn get_monthly_summary_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Path(user_id): Path<UserID>,
) -> Response {
    let summary = run_blocking(engine, move |engine| {
        engine.monthly_summary(user_id, engine.today()?)
    })
    .await;

    match summary {
        Ok(summary) => Json(summary).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for every monthly aggregate of a user, oldest first.
pub async fn get_months_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Path(user_id): Path<UserID>,
) -> Response {
    let months = engine
        .user_store()
        .get(user_id)
        .and_then(|_| engine.aggregate_store().get_by_user(user_id));

    match months {
        Ok(months) => Json(months).into_response(),
        Err(error) => error.into_response(),
    }
}
