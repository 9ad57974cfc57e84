//! Driving port for read-only user administration use-cases.
//!
//! HTTP handlers depend on this trait rather than on the store, so they can be
//! exercised with a mock and never see persistence types.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{Error, IdentityLookup, ListQuery, Permission, User};

/// Read operations over the user resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch one user.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::NoSuchUser`] when the identifier resolves
    /// to nothing.
    async fn get(&self, lookup: IdentityLookup) -> Result<User, Error>;

    /// List users matching the query. An empty page is a success.
    async fn list(&self, query: ListQuery) -> Result<Page<User>, Error>;

    /// Resolve the permission set of a user.
    async fn permissions(&self, lookup: IdentityLookup) -> Result<Vec<Permission>, Error>;
}
