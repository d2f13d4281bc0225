/// Repository module
///
/// This module provides the data access layer for the application.
/// It contains functions for reading and writing users, listings, tags and
/// types. Every query that touches user data is scoped to the owning user.
///
/// Domain failures (a missing row, a row owned by someone else, a refused
/// delete) are returned as [`RepoError`] inside the `anyhow::Error` so the
/// HTTP layer can map them to status codes.

mod user_repo;
mod tag_repo;
mod type_repo;
mod listing_repo;

// Re-export all repository functions
pub use user_repo::*;
pub use tag_repo::*;
pub use type_repo::*;
pub use listing_repo::*;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Domain errors raised by the repositories
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("Resource not found")]
    NotFound,
    #[error("This action is unauthorized.")]
    Forbidden,
    #[error("{0}")]
    Conflict(String),
}

/// Returns true when a write was refused by a `UNIQUE` constraint
///
/// The name and email checks read before the insert, so a concurrent
/// request can still take the value in between.
pub(crate) fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DieselError>(),
        Some(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
    )
}
