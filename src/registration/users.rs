//! User store seam
//!
//! The controller talks to the durable user store through this trait so the
//! SQLite backing (or a future remote one) can be swapped without touching
//! the state machine, and so tests can substitute failing or prefilled
//! stores.

use thiserror::Error;

/// A registration record to be inserted exactly once.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    /// Chat identity supplied by the transport
    pub identity: &'a str,
    pub full_name: &'a str,
    /// Normalized phone, unique across all records
    pub phone: &'a str,
    pub birth_date: &'a str,
}

/// Failure modes of [`UserStore::register`].
#[derive(Debug, Error)]
pub enum RegisterError {
    /// Another record already holds this phone; the store was not mutated
    #[error("phone number already registered")]
    DuplicatePhone,

    /// The store could not be reached or the write failed
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Durable storage of registered users.
///
/// Existence of a record for an identity is the sole authority on "is this
/// user registered". Records are created once and never mutated.
pub trait UserStore: Send + Sync {
    /// Whether a record exists for this identity.
    fn is_registered(&self, identity: &str) -> anyhow::Result<bool>;

    /// Greeting name (given name + patronymic) for a registered identity.
    fn greeting_name(&self, identity: &str) -> anyhow::Result<Option<String>>;

    /// Inserts the record, relying on the store's atomic uniqueness check.
    fn register(&self, user: &NewUser<'_>) -> Result<(), RegisterError>;
}
