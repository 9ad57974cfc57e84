//! In-memory `UserStore` adapter.
//!
//! Rows live behind a single `RwLock`, so every write (including a bulk
//! department move) is applied atomically with respect to concurrent
//! requests. Identifiers are assigned from a monotonically increasing
//! counter and never reused. Credentials are kept only as a salted SHA-256
//! digest.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use pagination::Page;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{
    DepartmentId, DepartmentMoveInput, ListQuery, Password, User, UserCreateInput,
    UserDeleteInput, UserEditInput, UserId, UserPasswordEditInput, UserSearch, UserStatus,
    UserStatusEditInput, UserValidationError, Username,
};

const SALT_BYTES: usize = 16;

/// Salted credential digest; the plaintext is never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Credential {
    salt: String,
    digest: String,
}

impl Credential {
    fn derive(password: &Password) -> Self {
        let mut salt = [0_u8; SALT_BYTES];
        OsRng.fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let digest = Self::digest(&salt, password.expose());
        Self { salt, digest }
    }

    fn digest(salt: &str, secret: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    #[cfg(test)]
    fn matches(&self, secret: &str) -> bool {
        Self::digest(&self.salt, secret) == self.digest
    }
}

#[derive(Debug, Clone)]
struct Row {
    user: User,
    credential: Credential,
}

#[derive(Debug, Default)]
struct Rows {
    last_id: i64,
    by_id: BTreeMap<i64, Row>,
}

impl Rows {
    fn username_taken(&self, username: &Username, except: Option<i64>) -> bool {
        self.by_id
            .values()
            .any(|row| row.user.username == *username && Some(row.user.id) != except)
    }
}

/// Thread-safe user store kept in process memory.
pub struct InMemoryUserStore {
    clock: Arc<dyn Clock>,
    rows: RwLock<Rows>,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryUserStore {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            rows: RwLock::new(Rows::default()),
        }
    }

    /// Create a store preloaded with a few demo accounts.
    ///
    /// # Errors
    /// Returns [`UserStoreError::Query`] if a demo row cannot be built.
    pub fn with_demo_users(clock: Arc<dyn Clock>) -> Result<Self, UserStoreError> {
        let store = Self::new(clock);
        let inputs = demo_users()
            .map_err(|err| UserStoreError::query(format!("invalid demo user: {err}")))?;
        for input in &inputs {
            store.insert_row(input)?;
        }
        Ok(store)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Rows>, UserStoreError> {
        self.rows
            .read()
            .map_err(|_| UserStoreError::query("user rows lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Rows>, UserStoreError> {
        self.rows
            .write()
            .map_err(|_| UserStoreError::query("user rows lock poisoned"))
    }

    fn insert_row(&self, input: &UserCreateInput) -> Result<i64, UserStoreError> {
        let now = self.clock.utc();
        let mut rows = self.write()?;
        if rows.username_taken(&input.username, None) {
            return Err(UserStoreError::conflict(format!(
                "username {} is already taken",
                input.username
            )));
        }
        rows.last_id += 1;
        let id = rows.last_id;
        let user = User {
            id,
            username: input.username.clone(),
            real_name: input.real_name.clone(),
            email: input.email.clone(),
            mobile: input.mobile.clone(),
            title: input.title.clone(),
            department_id: input.department_id.clone(),
            status: input.status,
            created_at: now,
            updated_at: now,
        };
        rows.by_id.insert(
            id,
            Row {
                user,
                credential: Credential::derive(&input.password),
            },
        );
        debug!(user_id = id, "row inserted");
        Ok(id)
    }

    fn modify<F>(&self, id: UserId, apply: F) -> Result<u64, UserStoreError>
    where
        F: FnOnce(&mut Row),
    {
        let now = self.clock.utc();
        let mut rows = self.write()?;
        let Some(row) = rows.by_id.get_mut(&id.get()) else {
            return Ok(0);
        };
        apply(row);
        row.user.updated_at = now;
        Ok(1)
    }
}

fn contains_folded(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(needle))
}

fn matches_search(user: &User, search: &UserSearch) -> bool {
    if search.status.is_some_and(|status| status != user.status) {
        return false;
    }
    if search
        .department
        .as_ref()
        .is_some_and(|department| *department != user.department_id)
    {
        return false;
    }
    let Some(q) = search.q.as_deref() else {
        return true;
    };
    let needle = q.to_lowercase();
    contains_folded(Some(user.username.as_str()), &needle)
        || contains_folded(user.real_name.as_deref(), &needle)
        || contains_folded(user.email.as_deref(), &needle)
        || contains_folded(user.mobile.as_deref(), &needle)
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn fetch_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        let rows = self.read()?;
        Ok(rows.by_id.get(&id.get()).map(|row| row.user.clone()))
    }

    async fn search(&self, query: &ListQuery) -> Result<Page<User>, UserStoreError> {
        let rows = self.read()?;
        let matching: Vec<&User> = rows
            .by_id
            .values()
            .map(|row| &row.user)
            .filter(|user| matches_search(user, &query.search))
            .collect();
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let result = query.page.window(matching).cloned().collect();
        Ok(Page::new(result, total))
    }

    async fn insert(&self, input: &UserCreateInput) -> Result<i64, UserStoreError> {
        self.insert_row(input)
    }

    async fn update_fields(&self, input: &UserEditInput) -> Result<u64, UserStoreError> {
        let now = self.clock.utc();
        let mut rows = self.write()?;
        if !rows.by_id.contains_key(&input.id.get()) {
            return Ok(0);
        }
        if let Some(username) = input.patch.username.as_ref()
            && rows.username_taken(username, Some(input.id.get()))
        {
            return Err(UserStoreError::conflict(format!(
                "username {username} is already taken"
            )));
        }
        let Some(row) = rows.by_id.get_mut(&input.id.get()) else {
            return Ok(0);
        };
        let patch = input.patch.clone();
        let user = &mut row.user;
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(department_id) = patch.department_id {
            user.department_id = department_id;
        }
        user.real_name = patch.real_name.or(user.real_name.take());
        user.email = patch.email.or(user.email.take());
        user.mobile = patch.mobile.or(user.mobile.take());
        user.title = patch.title.or(user.title.take());
        user.updated_at = now;
        Ok(1)
    }

    async fn update_status(&self, input: &UserStatusEditInput) -> Result<u64, UserStoreError> {
        let status = input.status;
        self.modify(input.id, |row| row.user.status = status)
    }

    async fn update_credential(
        &self,
        input: &UserPasswordEditInput,
    ) -> Result<u64, UserStoreError> {
        let credential = Credential::derive(&input.password);
        self.modify(input.id, |row| row.credential = credential)
    }

    async fn delete(&self, input: &UserDeleteInput) -> Result<u64, UserStoreError> {
        let mut rows = self.write()?;
        Ok(u64::from(rows.by_id.remove(&input.id.get()).is_some()))
    }

    async fn move_to_department(&self, input: &DepartmentMoveInput) -> Result<(), UserStoreError> {
        let now = self.clock.utc();
        let mut rows = self.write()?;
        if let Some(missing) = input
            .ids()
            .iter()
            .find(|id| !rows.by_id.contains_key(&id.get()))
        {
            return Err(UserStoreError::unknown_user(missing.get()));
        }
        for id in input.ids() {
            if let Some(row) = rows.by_id.get_mut(&id.get()) {
                row.user.department_id = input.department().clone();
                row.user.updated_at = now;
            }
        }
        Ok(())
    }
}

fn demo_user(
    username: &str,
    real_name: &str,
    department: &str,
    title: &str,
) -> Result<UserCreateInput, UserValidationError> {
    Ok(UserCreateInput {
        username: Username::new(username)?,
        password: Password::new("changeme")?,
        department_id: DepartmentId::new(department)?,
        real_name: Some(real_name.to_owned()),
        email: Some(format!("{username}@example.com")),
        mobile: None,
        title: Some(title.to_owned()),
        status: UserStatus::Enabled,
    })
}

fn demo_users() -> Result<Vec<UserCreateInput>, UserValidationError> {
    Ok(vec![
        demo_user("admin", "Administrator", "ops", "Operator")?,
        demo_user("wutong", "Wu Tong", "eng", "Engineer")?,
        demo_user("lihua", "Li Hua", "eng", "Engineer")?,
    ])
}

#[cfg(test)]
#[path = "user_store_tests.rs"]
mod tests;
