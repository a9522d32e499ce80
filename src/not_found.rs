//! The response for routes that do not exist.

use axum::response::{IntoResponse, Response};

use crate::Error;

/// The fallback handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
