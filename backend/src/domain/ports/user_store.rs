//! Driven port for user persistence.
//!
//! The store owns lookups, search, uniqueness and credential hashing. The
//! domain only inspects the signals it hands back: an optional row, a raw
//! identifier, an affected-row count, or a single pass/fail for bulk moves.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{
    DepartmentMoveInput, ListQuery, User, UserCreateInput, UserDeleteInput, UserEditInput, UserId,
    UserPasswordEditInput, UserStatusEditInput,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// The backing store could not be reached.
        Connection { message: String } => "user store connection failed: {message}",
        /// A query or mutation failed while executing.
        Query { message: String } => "user store query failed: {message}",
        /// A referenced user does not exist.
        UnknownUser { id: i64 } => "user {id} does not exist",
        /// A uniqueness constraint was violated.
        Conflict { message: String } => "user store conflict: {message}",
    }
}

/// Persistence contract for users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Load one user. `None`, or a row whose id is below `1`, means absent.
    async fn fetch_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError>;

    /// Return the requested window of matching users and the total count.
    async fn search(&self, query: &ListQuery) -> Result<Page<User>, UserStoreError>;

    /// Insert a user and return the raw identifier assigned to it.
    async fn insert(&self, input: &UserCreateInput) -> Result<i64, UserStoreError>;

    /// Apply a partial edit; returns the affected-row count.
    async fn update_fields(&self, input: &UserEditInput) -> Result<u64, UserStoreError>;

    /// Change a user's status; returns the affected-row count.
    async fn update_status(&self, input: &UserStatusEditInput) -> Result<u64, UserStoreError>;

    /// Replace a user's credential; returns the affected-row count.
    async fn update_credential(
        &self,
        input: &UserPasswordEditInput,
    ) -> Result<u64, UserStoreError>;

    /// Remove a user; returns the affected-row count.
    async fn delete(&self, input: &UserDeleteInput) -> Result<u64, UserStoreError>;

    /// Reassign every listed user to the target department.
    ///
    /// Implementations must be all-or-nothing: either every user moves and
    /// `Ok(())` is returned, or nothing changes and an error is returned.
    async fn move_to_department(&self, input: &DepartmentMoveInput) -> Result<(), UserStoreError>;
}
