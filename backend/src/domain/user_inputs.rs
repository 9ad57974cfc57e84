//! Per-operation inputs for the user administration use-cases.
//!
//! Every value here is built fresh for one request by the inbound validation
//! layer, consumed by exactly one service call, and then dropped.

use std::collections::HashSet;

use pagination::PageRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DepartmentId, Password, UserId, UserStatus, Username};

/// Lookup of a single user, used by Get and permission listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityLookup {
    /// User to resolve.
    pub id: UserId,
}

/// Optional filters applied to a user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearch {
    /// Case-insensitive text matched against username, real name, email and
    /// mobile.
    pub q: Option<String>,
    /// Restrict to one status.
    pub status: Option<UserStatus>,
    /// Restrict to one department.
    pub department: Option<DepartmentId>,
}

impl UserSearch {
    /// Whether no filter is set.
    #[must_use]
    pub const fn is_unfiltered(&self) -> bool {
        self.q.is_none() && self.status.is_none() && self.department.is_none()
    }
}

/// Paginated, searchable listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Clamped limit/offset window.
    pub page: PageRequest,
    /// Optional filters.
    pub search: UserSearch,
}

/// Everything needed to create a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreateInput {
    /// Unique login name.
    pub username: Username,
    /// Initial credential.
    pub password: Password,
    /// Owning department.
    pub department_id: DepartmentId,
    /// Full name.
    pub real_name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub mobile: Option<String>,
    /// Job title.
    pub title: Option<String>,
    /// Initial status, enabled unless stated.
    pub status: UserStatus,
}

/// Partial field set applied by Edit. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// New login name.
    pub username: Option<Username>,
    /// New full name.
    pub real_name: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New contact phone number.
    pub mobile: Option<String>,
    /// New job title.
    pub title: Option<String>,
    /// New department.
    pub department_id: Option<DepartmentId>,
}

impl UserPatch {
    /// Whether the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.real_name.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.title.is_none()
            && self.department_id.is_none()
    }
}

/// Field edit of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEditInput {
    /// User to edit.
    pub id: UserId,
    /// Fields to change; never empty.
    pub patch: UserPatch,
}

/// Status change of one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStatusEditInput {
    /// User to edit.
    pub id: UserId,
    /// New status.
    pub status: UserStatus,
}

/// Credential change of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPasswordEditInput {
    /// User to edit.
    pub id: UserId,
    /// New credential.
    pub password: Password,
}

/// Removal of one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDeleteInput {
    /// User to remove.
    pub id: UserId,
}

/// Rejections raised while assembling a [`DepartmentMoveInput`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepartmentMoveError {
    /// No identifiers were supplied.
    #[error("at least one user id is required")]
    NoIds,
}

/// Reassignment of several users to one department.
///
/// ## Invariants
/// - `ids` is non-empty and free of duplicates; first-seen order is kept.
///
/// # Examples
/// ```
/// use zeus_backend::domain::{DepartmentId, DepartmentMoveInput, UserId};
///
/// let ids = [2, 5, 2, 9].map(|raw| UserId::new(raw).expect("positive id"));
/// let input = DepartmentMoveInput::new(ids.to_vec(), DepartmentId::new("eng").expect("dept"))
///     .expect("non-empty ids");
/// let raw: Vec<i64> = input.ids().iter().map(|id| id.get()).collect();
/// assert_eq!(raw, vec![2, 5, 9]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentMoveInput {
    ids: Vec<UserId>,
    department: DepartmentId,
}

impl DepartmentMoveInput {
    /// Validate and construct a move.
    ///
    /// # Errors
    /// Returns [`DepartmentMoveError::NoIds`] when `ids` is empty.
    pub fn new(ids: Vec<UserId>, department: DepartmentId) -> Result<Self, DepartmentMoveError> {
        if ids.is_empty() {
            return Err(DepartmentMoveError::NoIds);
        }
        let mut seen = HashSet::with_capacity(ids.len());
        let ids = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        Ok(Self { ids, department })
    }

    /// Users to move, in request order.
    #[must_use]
    pub fn ids(&self) -> &[UserId] {
        &self.ids
    }

    /// Target department.
    #[must_use]
    pub const fn department(&self) -> &DepartmentId {
        &self.department
    }
}
