//! Tests for the in-memory user store.

use chrono::{DateTime, Local, Utc};
use pagination::PageRequest;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::UserPatch;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
}

#[fixture]
fn store() -> InMemoryUserStore {
    InMemoryUserStore::new(Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    }))
}

fn user_id(raw: i64) -> UserId {
    UserId::new(raw).expect("positive id")
}

fn create_input(username: &str, department: &str) -> UserCreateInput {
    UserCreateInput {
        username: Username::new(username).expect("username"),
        password: Password::new("s3cret-pass").expect("password"),
        department_id: DepartmentId::new(department).expect("department"),
        real_name: None,
        email: Some(format!("{username}@example.com")),
        mobile: None,
        title: None,
        status: UserStatus::Enabled,
    }
}

async fn seed(store: &InMemoryUserStore, names: &[(&str, &str)]) -> Vec<i64> {
    let mut ids = Vec::new();
    for (name, department) in names {
        ids.push(
            store
                .insert(&create_input(name, department))
                .await
                .expect("insert succeeds"),
        );
    }
    ids
}

fn credential_of(store: &InMemoryUserStore, id: i64) -> Credential {
    store
        .read()
        .expect("lock")
        .by_id
        .get(&id)
        .map(|row| row.credential.clone())
        .expect("row exists")
}

#[rstest]
#[tokio::test]
async fn insert_assigns_increasing_ids(store: InMemoryUserStore) {
    let ids = seed(&store, &[("ada", "eng"), ("grace", "eng")]).await;
    assert_eq!(ids, vec![1, 2]);

    let fetched = store
        .fetch_by_id(user_id(2))
        .await
        .expect("fetch succeeds")
        .expect("row present");
    assert_eq!(fetched.username.as_str(), "grace");
    assert_eq!(fetched.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn deleted_ids_are_not_reused(store: InMemoryUserStore) {
    seed(&store, &[("ada", "eng")]).await;
    let removed = store
        .delete(&UserDeleteInput { id: user_id(1) })
        .await
        .expect("delete succeeds");
    assert_eq!(removed, 1);

    let ids = seed(&store, &[("grace", "eng")]).await;
    assert_eq!(ids, vec![2]);
}

#[rstest]
#[tokio::test]
async fn duplicate_username_is_a_conflict(store: InMemoryUserStore) {
    seed(&store, &[("ada", "eng")]).await;
    let err = store
        .insert(&create_input("ada", "ops"))
        .await
        .expect_err("duplicate rejected");
    assert!(matches!(err, UserStoreError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn credentials_are_salted_digests(store: InMemoryUserStore) {
    seed(&store, &[("ada", "eng"), ("grace", "eng")]).await;
    let first = credential_of(&store, 1);
    let second = credential_of(&store, 2);

    assert!(first.matches("s3cret-pass"));
    assert!(!first.matches("wrong"));
    assert_ne!(first.digest, "s3cret-pass");
    assert_ne!(first.salt, second.salt);
    assert_ne!(first.digest, second.digest);
}

#[rstest]
#[tokio::test]
async fn credential_update_replaces_digest(store: InMemoryUserStore) {
    seed(&store, &[("ada", "eng")]).await;
    let affected = store
        .update_credential(&UserPasswordEditInput {
            id: user_id(1),
            password: Password::new("n3w-secret").expect("password"),
        })
        .await
        .expect("update succeeds");

    assert_eq!(affected, 1);
    assert!(credential_of(&store, 1).matches("n3w-secret"));
}

#[rstest]
#[tokio::test]
async fn search_filters_and_windows(store: InMemoryUserStore) {
    seed(
        &store,
        &[("ada", "eng"), ("adam", "ops"), ("grace", "eng"), ("adaline", "eng")],
    )
    .await;
    let query = ListQuery {
        page: PageRequest::clamped(Some(1), Some(1)),
        search: UserSearch {
            q: Some("ADA".to_owned()),
            status: None,
            department: Some(DepartmentId::new("eng").expect("department")),
        },
    };

    let page = store.search(&query).await.expect("search succeeds");
    assert_eq!(page.total, 2);
    assert_eq!(page.result.len(), 1);
    assert_eq!(page.result[0].username.as_str(), "adaline");
}

#[rstest]
#[tokio::test]
async fn search_by_status(store: InMemoryUserStore) {
    seed(&store, &[("ada", "eng"), ("grace", "eng")]).await;
    store
        .update_status(&UserStatusEditInput {
            id: user_id(2),
            status: UserStatus::Disabled,
        })
        .await
        .expect("status update");

    let query = ListQuery {
        search: UserSearch {
            status: Some(UserStatus::Disabled),
            ..UserSearch::default()
        },
        ..ListQuery::default()
    };
    let page = store.search(&query).await.expect("search succeeds");
    assert_eq!(page.total, 1);
    assert_eq!(page.result[0].id, 2);
}

#[rstest]
#[tokio::test]
async fn updates_of_absent_rows_affect_nothing(store: InMemoryUserStore) {
    let edited = store
        .update_fields(&UserEditInput {
            id: user_id(9),
            patch: UserPatch {
                title: Some("Lead".to_owned()),
                ..UserPatch::default()
            },
        })
        .await
        .expect("edit succeeds");
    let deleted = store
        .delete(&UserDeleteInput { id: user_id(9) })
        .await
        .expect("delete succeeds");

    assert_eq!(edited, 0);
    assert_eq!(deleted, 0);
}

#[rstest]
#[tokio::test]
async fn patch_keeps_untouched_fields(store: InMemoryUserStore) {
    seed(&store, &[("ada", "eng")]).await;
    store
        .update_fields(&UserEditInput {
            id: user_id(1),
            patch: UserPatch {
                title: Some("Lead".to_owned()),
                ..UserPatch::default()
            },
        })
        .await
        .expect("edit succeeds");

    let user = store
        .fetch_by_id(user_id(1))
        .await
        .expect("fetch")
        .expect("present");
    assert_eq!(user.title.as_deref(), Some("Lead"));
    assert_eq!(user.email.as_deref(), Some("ada@example.com"));
}

#[rstest]
#[tokio::test]
async fn renaming_to_taken_username_conflicts(store: InMemoryUserStore) {
    seed(&store, &[("ada", "eng"), ("grace", "eng")]).await;
    let err = store
        .update_fields(&UserEditInput {
            id: user_id(2),
            patch: UserPatch {
                username: Some(Username::new("ada").expect("username")),
                ..UserPatch::default()
            },
        })
        .await
        .expect_err("conflict");
    assert!(matches!(err, UserStoreError::Conflict { .. }));
}

#[rstest]
#[tokio::test]
async fn department_move_updates_every_listed_user(store: InMemoryUserStore) {
    seed(&store, &[("ada", "eng"), ("grace", "eng"), ("alan", "eng")]).await;
    let input = DepartmentMoveInput::new(
        vec![user_id(1), user_id(3)],
        DepartmentId::new("ops").expect("department"),
    )
    .expect("ids");

    store.move_to_department(&input).await.expect("move succeeds");

    for (id, expected) in [(1, "ops"), (2, "eng"), (3, "ops")] {
        let user = store
            .fetch_by_id(user_id(id))
            .await
            .expect("fetch")
            .expect("present");
        assert_eq!(user.department_id.as_str(), expected);
    }
}

#[rstest]
#[tokio::test]
async fn department_move_with_unknown_id_changes_nothing(store: InMemoryUserStore) {
    seed(&store, &[("ada", "eng")]).await;
    let input = DepartmentMoveInput::new(
        vec![user_id(1), user_id(2)],
        DepartmentId::new("ops").expect("department"),
    )
    .expect("ids");

    let err = store
        .move_to_department(&input)
        .await
        .expect_err("unknown id");
    assert!(matches!(err, UserStoreError::UnknownUser { id: 2 }));

    let user = store
        .fetch_by_id(user_id(1))
        .await
        .expect("fetch")
        .expect("present");
    assert_eq!(user.department_id.as_str(), "eng");
}

#[rstest]
fn demo_store_is_seeded() {
    let store = InMemoryUserStore::with_demo_users(Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    }))
    .expect("demo users are valid");
    let rows = store.read().expect("lock");
    assert_eq!(rows.by_id.len(), 3);
    assert_eq!(rows.last_id, 3);
}
