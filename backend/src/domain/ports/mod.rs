//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`UserStore`, `PermissionResolver`) are implemented by
//! outbound adapters and return typed port errors. Driving ports
//! (`UsersQuery`, `UsersCommand`) are implemented by the domain service and
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod permission_resolver;
mod user_store;
mod users_command;
mod users_query;

#[cfg(test)]
pub use permission_resolver::MockPermissionResolver;
pub use permission_resolver::{PermissionResolver, PermissionResolverError};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
