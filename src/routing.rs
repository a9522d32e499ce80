//! Application router configuration.

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::{
    AppState, Error, endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_user_transactions_endpoint,
    },
    user::{
        create_user_endpoint, delete_user_endpoint, get_monthly_summary_endpoint,
        get_months_endpoint, get_user_endpoint, update_user_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::USERS, post(create_user_endpoint))
        .route(
            endpoints::USER,
            get(get_user_endpoint)
                .put(update_user_endpoint)
                .delete(delete_user_endpoint),
        )
        .route(endpoints::USER_SUMMARY, get(get_monthly_summary_endpoint))
        .route(endpoints::USER_MONTHS, get(get_months_endpoint))
        .route(
            endpoints::USER_TRANSACTIONS,
            get(get_user_transactions_endpoint),
        )
        .route(endpoints::TRANSACTIONS, post(create_transaction_endpoint))
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint).delete(delete_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The origins of the local web client's dev server.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "https://localhost:5173"];

/// Wrap `router` in a CORS layer that accepts credentialed requests from `origins`.
///
/// Any method and request header is allowed. These are mirrored back rather
/// than sent as `*` since browsers reject a wildcard on credentialed requests.
///
/// # Errors
/// Returns [Error::InvalidOrigin] if an origin is not a valid header value.
pub fn add_cors_layer(router: Router, origins: &[String]) -> Result<Router, Error> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| Error::InvalidOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let cors_layer = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Ok(router.layer(cors_layer))
}
