//! Driving port for mutating user administration use-cases.

use async_trait::async_trait;

use crate::domain::{
    DepartmentMoveInput, Error, UserCreateInput, UserDeleteInput, UserEditInput, UserId,
    UserPasswordEditInput, UserStatusEditInput,
};

/// Write operations over the user resource.
///
/// Each method maps the store's count or flag signal into either success or
/// one taxonomy error; callers never see partial results.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create a user and return its identifier.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::CreateFailed`] when no valid identifier
    /// was assigned.
    async fn create(&self, input: UserCreateInput) -> Result<UserId, Error>;

    /// Apply a partial field edit.
    async fn edit(&self, input: UserEditInput) -> Result<(), Error>;

    /// Change a user's status.
    async fn edit_status(&self, input: UserStatusEditInput) -> Result<(), Error>;

    /// Replace a user's credential.
    async fn edit_password(&self, input: UserPasswordEditInput) -> Result<(), Error>;

    /// Remove a user.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::DeleteFailed`] when nothing was removed.
    async fn delete(&self, input: UserDeleteInput) -> Result<(), Error>;

    /// Move several users to one department as a single unit.
    ///
    /// # Errors
    /// [`crate::domain::ErrorCode::EditFailed`] on any failure, without
    /// reporting which users moved.
    async fn move_department(&self, input: DepartmentMoveInput) -> Result<(), Error>;
}
