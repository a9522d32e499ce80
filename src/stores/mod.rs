//! Contains traits and implementations for objects that store the domain [models](crate::models).
//!
//! Store methods take `&self`: implementations are expected to synchronise
//! access internally so that one store can be shared by many request handlers.

mod aggregate;
mod transaction;
mod user;

pub mod sqlite;

pub use aggregate::AggregateStore;
pub use transaction::TransactionStore;
pub use user::UserStore;
