//! Defines the user store trait.

use crate::{
    Error,
    models::{User, UserID, UserName},
};

/// Handles the creation and retrieval of users and their net worth.
pub trait UserStore {
    /// Create a new user with a net worth of zero.
    fn create(&self, name: UserName) -> Result<User, Error>;

    /// Get a user by their ID.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Change a user's name.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn update_name(&self, id: UserID, name: UserName) -> Result<User, Error>;

    /// Overwrite a user's net worth with `net_worth`.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn set_net_worth(&self, id: UserID, net_worth: f64) -> Result<(), Error>;

    /// Delete a user along with everything they own.
    ///
    /// Returns [Error::NotFound] if no user with the given ID exists.
    fn delete(&self, id: UserID) -> Result<(), Error>;
}
