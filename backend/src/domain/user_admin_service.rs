//! User administration service.
//!
//! Implements the [`UsersQuery`] and [`UsersCommand`] driving ports on top of
//! the [`UserStore`] and [`PermissionResolver`] driven ports. Each operation
//! makes exactly one collaborator call and turns its signal into either a
//! typed success or one taxonomy error:
//!
//! | operation        | failure signal                   | error          |
//! |------------------|----------------------------------|----------------|
//! | get              | no row, or row id below 1        | `NoSuchUser`   |
//! | create           | assigned id below 1              | `CreateFailed` |
//! | edit / status / password | zero affected rows (strict) | `EditFailed` |
//! | delete           | zero affected rows               | `DeleteFailed` |
//! | move department  | any store error                  | `EditFailed`   |

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    PermissionResolver, PermissionResolverError, UserStore, UserStoreError, UsersCommand,
    UsersQuery,
};
use crate::domain::{
    DepartmentMoveInput, Error, IdentityLookup, ListQuery, Permission, User, UserCreateInput,
    UserDeleteInput, UserEditInput, UserId, UserPasswordEditInput, UserStatusEditInput,
};

/// How single-user edits treat a zero affected-row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditPolicy {
    /// Report `EditFailed`, matching how deletes behave.
    #[default]
    Strict,
    /// Acknowledge anyway, for clients that depend on the historic
    /// behaviour.
    Lenient,
}

impl EditPolicy {
    /// Select the policy from a `lenient` flag.
    #[must_use]
    pub const fn from_lenient(lenient: bool) -> Self {
        if lenient { Self::Lenient } else { Self::Strict }
    }
}

/// User administration service implementing the driving ports.
#[derive(Clone)]
pub struct UserAdminService<S, P> {
    store: Arc<S>,
    permissions: Arc<P>,
    edit_policy: EditPolicy,
}

impl<S, P> UserAdminService<S, P> {
    /// Create a service using [`EditPolicy::Strict`].
    pub fn new(store: Arc<S>, permissions: Arc<P>) -> Self {
        Self {
            store,
            permissions,
            edit_policy: EditPolicy::Strict,
        }
    }

    /// Override the zero-affected-rows policy for single-user edits.
    #[must_use]
    pub fn with_edit_policy(mut self, edit_policy: EditPolicy) -> Self {
        self.edit_policy = edit_policy;
        self
    }
}

impl<S, P> UserAdminService<S, P>
where
    S: UserStore,
    P: PermissionResolver,
{
    fn map_read_error(err: UserStoreError) -> Error {
        match err {
            UserStoreError::Connection { message } => {
                error!(%message, "user store unreachable");
                Error::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserStoreError::UnknownUser { .. } => Error::no_such_user(),
            UserStoreError::Query { message } | UserStoreError::Conflict { message } => {
                error!(%message, "user store read failed");
                Error::internal(format!("user store error: {message}"))
            }
        }
    }

    fn map_write_error(err: UserStoreError, rejected: fn() -> Error) -> Error {
        match err {
            UserStoreError::Connection { message } => {
                error!(%message, "user store unreachable");
                Error::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserStoreError::Query { message } => {
                error!(%message, "user store write failed");
                Error::internal(format!("user store error: {message}"))
            }
            UserStoreError::Conflict { message } => {
                warn!(%message, "user store rejected write");
                rejected().with_details(json!({ "code": "conflict", "reason": message }))
            }
            UserStoreError::UnknownUser { id } => {
                warn!(user_id = id, "user store rejected write for unknown user");
                rejected()
            }
        }
    }

    fn map_permission_error(err: PermissionResolverError) -> Error {
        match err {
            PermissionResolverError::Unavailable { message } => {
                error!(%message, "permission source unreachable");
                Error::service_unavailable(format!("permission source unavailable: {message}"))
            }
            PermissionResolverError::Query { message } => {
                error!(%message, "permission resolution failed");
                Error::internal(format!("permission resolution failed: {message}"))
            }
        }
    }

    fn check_edit(&self, affected: u64, id: UserId, operation: &'static str) -> Result<(), Error> {
        if affected > 0 {
            info!(user_id = %id, operation, affected, "user updated");
            return Ok(());
        }
        match self.edit_policy {
            EditPolicy::Strict => {
                warn!(user_id = %id, operation, "update affected no rows");
                Err(Error::edit_failed())
            }
            EditPolicy::Lenient => {
                warn!(user_id = %id, operation, "update affected no rows; acknowledging");
                Ok(())
            }
        }
    }
}

#[async_trait]
impl<S, P> UsersQuery for UserAdminService<S, P>
where
    S: UserStore,
    P: PermissionResolver,
{
    async fn get(&self, lookup: IdentityLookup) -> Result<User, Error> {
        let found = self
            .store
            .fetch_by_id(lookup.id)
            .await
            .map_err(Self::map_read_error)?;
        match found {
            Some(user) if user.stored_id().is_some() => Ok(user),
            _ => Err(Error::no_such_user()),
        }
    }

    async fn list(&self, query: ListQuery) -> Result<Page<User>, Error> {
        self.store
            .search(&query)
            .await
            .map_err(Self::map_read_error)
    }

    async fn permissions(&self, lookup: IdentityLookup) -> Result<Vec<Permission>, Error> {
        self.permissions
            .resolve(lookup.id)
            .await
            .map_err(Self::map_permission_error)
    }
}

#[async_trait]
impl<S, P> UsersCommand for UserAdminService<S, P>
where
    S: UserStore,
    P: PermissionResolver,
{
    async fn create(&self, input: UserCreateInput) -> Result<UserId, Error> {
        let raw = self
            .store
            .insert(&input)
            .await
            .map_err(|err| Self::map_write_error(err, Error::create_failed))?;
        let Some(id) = UserId::from_stored(raw) else {
            warn!(assigned = raw, username = %input.username, "store assigned no valid id");
            return Err(Error::create_failed());
        };
        info!(user_id = %id, username = %input.username, "user created");
        Ok(id)
    }

    async fn edit(&self, input: UserEditInput) -> Result<(), Error> {
        let affected = self
            .store
            .update_fields(&input)
            .await
            .map_err(|err| Self::map_write_error(err, Error::edit_failed))?;
        self.check_edit(affected, input.id, "edit")
    }

    async fn edit_status(&self, input: UserStatusEditInput) -> Result<(), Error> {
        let affected = self
            .store
            .update_status(&input)
            .await
            .map_err(|err| Self::map_write_error(err, Error::edit_failed))?;
        self.check_edit(affected, input.id, "edit_status")
    }

    async fn edit_password(&self, input: UserPasswordEditInput) -> Result<(), Error> {
        let affected = self
            .store
            .update_credential(&input)
            .await
            .map_err(|err| Self::map_write_error(err, Error::edit_failed))?;
        self.check_edit(affected, input.id, "edit_password")
    }

    async fn delete(&self, input: UserDeleteInput) -> Result<(), Error> {
        let affected = self
            .store
            .delete(&input)
            .await
            .map_err(|err| Self::map_write_error(err, Error::delete_failed))?;
        if affected == 0 {
            warn!(user_id = %input.id, "delete affected no rows");
            return Err(Error::delete_failed());
        }
        info!(user_id = %input.id, affected, "user deleted");
        Ok(())
    }

    async fn move_department(&self, input: DepartmentMoveInput) -> Result<(), Error> {
        let count = input.ids().len();
        match self.store.move_to_department(&input).await {
            Ok(()) => {
                info!(
                    users = count,
                    department = %input.department(),
                    "users moved to department"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    users = count,
                    department = %input.department(),
                    error = %err,
                    "department move rejected"
                );
                Err(Error::edit_failed())
            }
        }
    }
}

#[cfg(test)]
#[path = "user_admin_service_tests.rs"]
mod tests;
