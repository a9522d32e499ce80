//! Defines the endpoints for reading transactions.
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    database_id::TransactionId,
    models::UserID,
    stores::{TransactionStore, UserStore, sqlite::SQLiteEngine},
};

/// A route handler for getting a transaction by its database ID.
///
/// Responds with 404 if the requested transaction does not exist.
pub async fn get_transaction_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match engine.transaction_store().get(transaction_id) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler for listing a user's transactions, oldest first.
///
/// Responds with 404 if the user does not exist.
pub async fn get_user_transactions_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Path(user_id): Path<UserID>,
) -> Response {
    let transactions = engine
        .user_store()
        .get(user_id)
        .and_then(|_| engine.transaction_store().get_by_user(user_id));

    match transactions {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => error.into_response(),
    }
}
