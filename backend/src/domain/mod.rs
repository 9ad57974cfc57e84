//! Domain primitives, operation inputs, and the user administration service.
//!
//! Purpose: keep the user resource contract transport agnostic. Inbound
//! adapters build the operation inputs, call the driving ports, and render
//! whatever comes back; outbound adapters implement the driven ports.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: failure taxonomy shared by every operation.
//! - `User`, `UserId`, `Username`, `Password`, `DepartmentId`, `UserStatus`,
//!   `Permission`: user value types.
//! - Operation inputs such as `ListQuery` and `DepartmentMoveInput`.
//! - `UserAdminService`: implementation of `ports::UsersQuery` and
//!   `ports::UsersCommand`.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_admin_service;
pub mod user_inputs;

pub use self::error::{Error, ErrorCode, ErrorValidationError, UnknownErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DepartmentId, Password, Permission, User, UserId, UserStatus, UserValidationError, Username,
};
pub use self::user_admin_service::{EditPolicy, UserAdminService};
pub use self::user_inputs::{
    DepartmentMoveError, DepartmentMoveInput, IdentityLookup, ListQuery, UserCreateInput,
    UserDeleteInput, UserEditInput, UserPasswordEditInput, UserPatch, UserSearch,
    UserStatusEditInput,
};
