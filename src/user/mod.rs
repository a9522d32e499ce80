//! The JSON endpoints for users and their derived monthly figures.

mod create_user_endpoint;
mod summary_endpoint;
mod user_endpoint;

pub use create_user_endpoint::create_user_endpoint;
pub use summary_endpoint::{get_monthly_summary_endpoint, get_months_endpoint};
pub use user_endpoint::{delete_user_endpoint, get_user_endpoint, update_user_endpoint};

use serde::Deserialize;

/// The JSON body for creating or renaming a user.
///
/// `name` is validated in the handler so that a blank name is reported as
/// [Error::EmptyUserName](crate::Error::EmptyUserName) rather than a JSON
/// deserialization failure.
#[derive(Debug, Deserialize)]
pub struct UserForm {
    /// The user's display name, must not be blank.
    pub name: String,
}
