//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
}

impl HttpState {
    /// Construct state from the read and write ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use zeus_backend::domain::UserAdminService;
    /// use zeus_backend::inbound::http::state::HttpState;
    /// use zeus_backend::outbound::memory::{InMemoryPermissionResolver, InMemoryUserStore};
    ///
    /// let store = Arc::new(InMemoryUserStore::default());
    /// let permissions = Arc::new(InMemoryPermissionResolver::new(store.clone()));
    /// let service = Arc::new(UserAdminService::new(store, permissions));
    /// let state = HttpState::new(service.clone(), service);
    /// let _users = state.users.clone();
    /// ```
    pub fn new(users: Arc<dyn UsersQuery>, users_command: Arc<dyn UsersCommand>) -> Self {
        Self {
            users,
            users_command,
        }
    }
}
