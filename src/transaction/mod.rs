//! The JSON endpoints for creating, reading and deleting transactions.
//!
//! Creating or deleting a transaction rebuilds the owning user's net worth
//! and monthly aggregates before the response is sent.

mod create_transaction_endpoint;
mod delete_transaction_endpoint;
mod get_transaction_endpoint;

pub use create_transaction_endpoint::create_transaction_endpoint;
pub use delete_transaction_endpoint::delete_transaction_endpoint;
pub use get_transaction_endpoint::{get_transaction_endpoint, get_user_transactions_endpoint};
