//! In-memory `PermissionResolver` adapter.
//!
//! A user's effective permissions are the grants of their department merged
//! with grants made to the user directly, de-duplicated and sorted.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{PermissionResolver, PermissionResolverError, UserStore, UserStoreError};
use crate::domain::{DepartmentId, Permission, UserId, UserValidationError};

#[derive(Debug, Default)]
struct Grants {
    by_department: HashMap<DepartmentId, BTreeSet<Permission>>,
    by_user: HashMap<UserId, BTreeSet<Permission>>,
}

/// Permission grants kept in process memory, keyed by department and user.
pub struct InMemoryPermissionResolver {
    users: Arc<dyn UserStore>,
    grants: RwLock<Grants>,
}

impl InMemoryPermissionResolver {
    /// Create a resolver with no grants, reading departments from `users`.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            grants: RwLock::new(Grants::default()),
        }
    }

    /// Create a resolver with the demo department grants.
    ///
    /// # Errors
    /// Returns [`PermissionResolverError::Query`] if a grant cannot be stored.
    pub fn with_demo_grants(users: Arc<dyn UserStore>) -> Result<Self, PermissionResolverError> {
        let resolver = Self::new(users);
        let department = |raw: &str| {
            DepartmentId::new(raw).map_err(|err: UserValidationError| {
                PermissionResolverError::query(format!("invalid demo department: {err}"))
            })
        };
        resolver.grant_department(
            department("ops")?,
            ["user:read", "user:create", "user:edit", "user:delete"],
        )?;
        resolver.grant_department(department("eng")?, ["user:read"])?;
        Ok(resolver)
    }

    /// Grant permissions to every member of a department.
    ///
    /// # Errors
    /// Returns [`PermissionResolverError::Query`] if the grant table is
    /// poisoned.
    pub fn grant_department<I, P>(
        &self,
        department: DepartmentId,
        permissions: I,
    ) -> Result<(), PermissionResolverError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut grants = self.write()?;
        grants
            .by_department
            .entry(department)
            .or_default()
            .extend(permissions.into_iter().map(Permission::new));
        Ok(())
    }

    /// Grant permissions to one user.
    ///
    /// # Errors
    /// Returns [`PermissionResolverError::Query`] if the grant table is
    /// poisoned.
    pub fn grant_user<I, P>(
        &self,
        id: UserId,
        permissions: I,
    ) -> Result<(), PermissionResolverError>
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let mut grants = self.write()?;
        grants
            .by_user
            .entry(id)
            .or_default()
            .extend(permissions.into_iter().map(Permission::new));
        Ok(())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Grants>, PermissionResolverError> {
        self.grants
            .write()
            .map_err(|_| PermissionResolverError::query("permission grants lock poisoned"))
    }
}

fn map_store_error(err: UserStoreError) -> PermissionResolverError {
    match err {
        UserStoreError::Connection { message } => PermissionResolverError::unavailable(message),
        other => PermissionResolverError::query(other.to_string()),
    }
}

#[async_trait]
impl PermissionResolver for InMemoryPermissionResolver {
    async fn resolve(&self, id: UserId) -> Result<Vec<Permission>, PermissionResolverError> {
        let Some(user) = self.users.fetch_by_id(id).await.map_err(map_store_error)? else {
            // Ids are never reused, so grants left by a deleted user are dead.
            if self.write()?.by_user.remove(&id).is_some() {
                debug!(user_id = id.get(), "pruned grants of absent user");
            }
            return Ok(Vec::new());
        };

        let grants = self
            .grants
            .read()
            .map_err(|_| PermissionResolverError::query("permission grants lock poisoned"))?;
        let mut merged = BTreeSet::new();
        if let Some(from_department) = grants.by_department.get(&user.department_id) {
            merged.extend(from_department.iter().cloned());
        }
        if let Some(direct) = grants.by_user.get(&id) {
            merged.extend(direct.iter().cloned());
        }
        Ok(merged.into_iter().collect())
    }
}
