//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use time::Date;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A monthly aggregate that reconciliation should have created is missing.
    ///
    /// This indicates a logic defect rather than a problem with the request.
    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    /// A transaction amount was zero, negative or not a finite number.
    ///
    /// Whether a transaction adds or subtracts money is decided by its type,
    /// so amounts are always positive magnitudes.
    #[error("{0} is not a valid transaction amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// An empty string was used for a user's name.
    #[error("user name cannot be empty")]
    EmptyUserName,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Could not acquire the reconciliation lock for a user.
    #[error("could not acquire the reconciliation lock for user {0}")]
    UserLockError(i64),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// A CORS origin could not be used as a header value.
    #[error("invalid CORS origin \"{0}\"")]
    InvalidOrigin(String),

    /// A task on the blocking thread pool panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    BlockingTaskFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound | Error::DeleteMissingTransaction => StatusCode::NOT_FOUND,
            Error::InvalidAmount(_) | Error::FutureDate(_) | Error::EmptyUserName => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Any errors that are not handled above are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use time::macros::date;

    use super::Error;

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn client_errors_have_client_status_codes() {
        let cases = [
            (Error::NotFound, StatusCode::NOT_FOUND),
            (Error::DeleteMissingTransaction, StatusCode::NOT_FOUND),
            (Error::InvalidAmount(-1.0), StatusCode::BAD_REQUEST),
            (Error::FutureDate(date!(2099 - 01 - 01)), StatusCode::BAD_REQUEST),
            (Error::EmptyUserName, StatusCode::BAD_REQUEST),
        ];

        for (error, want) in cases {
            let got = error.into_response().status();
            assert_eq!(got, want);
        }
    }

    #[test]
    fn inconsistent_state_is_a_server_error() {
        let response = Error::InconsistentState("missing row".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
