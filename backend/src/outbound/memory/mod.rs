//! In-memory adapters for the user store and permission resolver.
//!
//! They back the binary when no external store is configured and give the
//! integration tests a real implementation of each driven port.

mod permission_resolver;
mod user_store;

pub use permission_resolver::InMemoryPermissionResolver;
pub use user_store::InMemoryUserStore;
