use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{app_state::run_blocking, database_id::TransactionId, stores::sqlite::SQLiteEngine};

/// A route handler for deleting a transaction, responds with 204 No Content on success.
pub async fn delete_transaction_endpoint(
    State(engine): State<Arc<SQLiteEngine>>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let deleted = run_blocking(engine, move |engine| {
        engine.on_transaction_deleted(transaction_id)
    })
    .await;

    match deleted {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Router, http::StatusCode, routing::delete};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{
        Error, endpoints,
        endpoints::format_endpoint,
        models::{Transaction, TransactionType, UserName},
        stores::{
            TransactionStore, UserStore,
            sqlite::{SQLiteEngine, create_engine},
        },
    };

    use super::delete_transaction_endpoint;

    fn get_test_server() -> (TestServer, Arc<SQLiteEngine>) {
        let connection = Connection::open_in_memory().unwrap();
        let engine = Arc::new(create_engine(connection, "Etc/UTC").unwrap());

        let app = Router::new()
            .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
            .with_state(engine.clone());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        (server, engine)
    }

    #[tokio::test]
    async fn can_delete_transaction() {
        let (server, engine) = get_test_server();
        let user = engine.register_user(UserName::new("Test").unwrap()).unwrap();
        let transaction = engine
            .on_transaction_created(Transaction::build(
                user.id,
                25.0,
                OffsetDateTime::now_utc().date(),
                TransactionType::Income,
            ))
            .unwrap();

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, transaction.id))
            .await
            .assert_status(StatusCode::NO_CONTENT);

        assert_eq!(
            engine.transaction_store().get(transaction.id),
            Err(Error::NotFound)
        );
        assert_eq!(engine.user_store().get(user.id).unwrap().net_worth, 0.0);
    }

    #[tokio::test]
    async fn delete_missing_transaction_is_not_found() {
        let (server, _) = get_test_server();

        server
            .delete(&format_endpoint(endpoints::TRANSACTION, 1337))
            .await
            .assert_status_not_found();
    }
}
