//! Defines the endpoint for creating a new transaction.
use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::Date;

use crate::{
    app_state::run_blocking,
    endpoints::{self, format_endpoint},
    models::{Transaction, TransactionType, UserID},
    stores::sqlite::SQLiteEngine,
};

/// The JSON body for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The user that owns the transaction.
    pub user_id: UserID,
    /// The amount of money in dollars, must be greater than zero.
    pub amount: f64,
    /// The date when the transaction ocurred.
    pub date: Date,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A free text label, e.g. "Groceries".
    #[serde(default)]
    pub category: String,
    /// Who paid or was paid.
    #[serde(default)]
    pub recipient: String,
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 Created, the new transaction and its location once the
/// owner's derived figures have been rebuilt.
pub async fn create_transaction_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Json(form): Json<TransactionForm>,
) -> Response {
    let builder = Transaction::build(form.user_id, form.amount, form.date, form.transaction_type)
        .category(&form.category)
        .recipient(&form.recipient);

    match run_blocking(engine, move |engine| engine.on_transaction_created(builder)).await {
        Ok(transaction) => (
            StatusCode::CREATED,
            [(
                LOCATION,
                format_endpoint(endpoints::TRANSACTION, transaction.id),
            )],
            Json(transaction),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
