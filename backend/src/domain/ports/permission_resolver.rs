//! Driven port resolving the effective permission set of a user.

use async_trait::async_trait;

use crate::domain::{Permission, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by permission resolver adapters.
    pub enum PermissionResolverError {
        /// The permission source could not be reached.
        Unavailable { message: String } => "permission source unavailable: {message}",
        /// Resolving the permission graph failed.
        Query { message: String } => "permission resolution failed: {message}",
    }
}

/// Resolves permissions granted to a user directly or through roles and
/// departments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionResolver: Send + Sync {
    /// Return the resolved permission set for `id`.
    async fn resolve(&self, id: UserId) -> Result<Vec<Permission>, PermissionResolverError>;
}
