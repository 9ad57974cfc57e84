//! Tests for user resource handlers.

use super::*;
use crate::domain::ports::{MockUsersCommand, MockUsersQuery};
use crate::domain::{DepartmentId, Permission};
use crate::inbound::http::validation::configure_extractors;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::DateTime;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn user_id(raw: i64) -> UserId {
    UserId::new(raw).expect("positive id")
}

fn sample_user(id: i64) -> User {
    let at = DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp");
    User {
        id,
        username: Username::new("wutong").expect("username"),
        real_name: Some("Wu Tong".to_owned()),
        email: None,
        mobile: None,
        title: None,
        department_id: DepartmentId::new("eng").expect("department"),
        status: UserStatus::Enabled,
        created_at: at,
        updated_at: at,
    }
}

async fn call(
    query: MockUsersQuery,
    command: MockUsersCommand,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let state = web::Data::new(HttpState::new(Arc::new(query), Arc::new(command)));
    let app = actix_test::init_service(
        App::new()
            .app_data(state)
            .configure(configure_extractors)
            .configure(configure),
    )
    .await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("JSON body");
    (status, value)
}

async fn call_query(
    query: MockUsersQuery,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    call(query, MockUsersCommand::new(), request).await
}

async fn call_command(
    command: MockUsersCommand,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    call(MockUsersQuery::new(), command, request).await
}

fn assert_validation(body: &Value, field: &str, code: &str) {
    assert_eq!(body["code"], json!(10001));
    assert_eq!(body["details"]["field"], json!(field));
    assert_eq!(body["details"]["code"], json!(code));
}

#[actix_web::test]
async fn get_user_wraps_entity_in_result() {
    let mut query = MockUsersQuery::new();
    query
        .expect_get()
        .withf(|lookup| lookup.id == user_id(7))
        .times(1)
        .return_once(|_| Ok(sample_user(7)));

    let (status, body) =
        call_query(query, actix_test::TestRequest::get().uri("/v1/api/users/7")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], json!(200));
    assert_eq!(body["data"]["result"]["id"], json!(7));
    assert_eq!(body["data"]["result"]["departmentId"], json!("eng"));
}

#[rstest]
#[case("0")]
#[case("-2")]
#[actix_web::test]
async fn get_user_with_non_positive_id_is_no_such_user(#[case] raw: &str) {
    let (status, body) = call_query(
        MockUsersQuery::new(),
        actix_test::TestRequest::get().uri(&format!("/v1/api/users/{raw}")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!(10004));
}

#[actix_web::test]
async fn get_user_with_malformed_id_never_calls_port() {
    let (status, body) = call_query(
        MockUsersQuery::new(),
        actix_test::TestRequest::get().uri("/v1/api/users/abc"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation(&body, "id", "invalid_id");
}

#[actix_web::test]
async fn list_users_clamps_page_and_forwards_filters() {
    let mut query = MockUsersQuery::new();
    query
        .expect_list()
        .withf(|q| {
            q.page.limit() == 100
                && q.page.offset() == 0
                && q.search.q.as_deref() == Some("wu")
                && q.search.status == Some(UserStatus::Disabled)
        })
        .times(1)
        .return_once(|_| Ok(Page::new(vec![sample_user(1)], 31)));

    let (status, body) = call_query(
        query,
        actix_test::TestRequest::get()
            .uri("/v1/api/users?limit=500&offset=-4&q=wu&status=disabled"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(31));
    assert_eq!(body["data"]["result"].as_array().map(Vec::len), Some(1));
}

#[rstest]
#[case("limit=99999999999999999999", 100, 0)]
#[case("limit=-99999999999999999999&offset=-99999999999999999999", 1, 0)]
#[case("offset=99999999999999999999", 20, u64::MAX >> 1)]
#[actix_web::test]
async fn list_users_clamps_integers_beyond_i64(
    #[case] query_string: &str,
    #[case] limit: u32,
    #[case] offset: u64,
) {
    let mut query = MockUsersQuery::new();
    query
        .expect_list()
        .withf(move |q| q.page.limit() == limit && q.page.offset() == offset)
        .times(1)
        .return_once(|_| Ok(Page::empty()));

    let (status, body) = call_query(
        query,
        actix_test::TestRequest::get().uri(&format!("/v1/api/users?{query_string}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(0));
}

#[actix_web::test]
async fn list_users_with_defaults_returns_empty_page() {
    let mut query = MockUsersQuery::new();
    query
        .expect_list()
        .withf(|q| q.page.limit() == 20 && q.search.is_unfiltered())
        .times(1)
        .return_once(|_| Ok(Page::empty()));

    let (status, body) =
        call_query(query, actix_test::TestRequest::get().uri("/v1/api/users")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"result": [], "total": 0}));
}

#[rstest]
#[case("/v1/api/users?limit=ten", "limit", "invalid_integer")]
#[case("/v1/api/users?status=archived", "status", "invalid_status")]
#[actix_web::test]
async fn list_users_rejects_bad_query(
    #[case] uri: &str,
    #[case] field: &str,
    #[case] code: &str,
) {
    let (status, body) =
        call_query(MockUsersQuery::new(), actix_test::TestRequest::get().uri(uri)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation(&body, field, code);
}

#[actix_web::test]
async fn create_user_returns_new_identifier() {
    let mut command = MockUsersCommand::new();
    command
        .expect_create()
        .withf(|input| {
            input.username.as_str() == "wutong"
                && input.department_id.as_str() == "eng"
                && input.status == UserStatus::Enabled
        })
        .times(1)
        .return_once(|_| Ok(user_id(42)));

    let (status, body) = call_command(
        command,
        actix_test::TestRequest::post().uri("/v1/api/users").set_json(json!({
            "username": "wutong",
            "password": "s3cret-pass",
            "departmentId": "eng",
            "email": "wutong@example.com"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"code": 200, "data": {"id": 42}}));
}

#[rstest]
#[case(json!(""), UserStatus::Enabled)]
#[case(json!("  "), UserStatus::Enabled)]
#[case(json!(" Disabled "), UserStatus::Disabled)]
#[actix_web::test]
async fn create_user_treats_blank_status_as_default(
    #[case] raw_status: Value,
    #[case] expected: UserStatus,
) {
    let mut command = MockUsersCommand::new();
    command
        .expect_create()
        .withf(move |input| input.status == expected)
        .times(1)
        .return_once(|_| Ok(user_id(5)));

    let (status, body) = call_command(
        command,
        actix_test::TestRequest::post().uri("/v1/api/users").set_json(json!({
            "username": "wutong",
            "password": "s3cret-pass",
            "departmentId": "eng",
            "status": raw_status
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(5));
}

#[actix_web::test]
async fn create_user_failure_is_a_single_failure_envelope() {
    let mut command = MockUsersCommand::new();
    command
        .expect_create()
        .times(1)
        .return_once(|_| Err(Error::create_failed()));

    let (status, body) = call_command(
        command,
        actix_test::TestRequest::post().uri("/v1/api/users").set_json(json!({
            "username": "wutong",
            "password": "s3cret-pass",
            "departmentId": 3
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!(10002));
    assert!(body.get("data").is_none());
}

#[rstest]
#[case(json!({"password": "s3cret-pass", "departmentId": "eng"}), "username", "missing_field")]
#[case(json!({"username": "wutong", "departmentId": "eng"}), "password", "missing_field")]
#[case(json!({"username": "wutong", "password": "s3cret-pass"}), "departmentId", "missing_field")]
#[case(
    json!({"username": "w", "password": "s3cret-pass", "departmentId": "eng"}),
    "username",
    "invalid_username"
)]
#[case(
    json!({"username": "wutong", "password": "123", "departmentId": "eng"}),
    "password",
    "invalid_password"
)]
#[case(
    json!({
        "username": "wutong",
        "password": "s3cret-pass",
        "departmentId": "eng",
        "email": "nope"
    }),
    "email",
    "invalid_email"
)]
#[actix_web::test]
async fn create_user_rejects_invalid_payloads(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let (status, body) = call_command(
        MockUsersCommand::new(),
        actix_test::TestRequest::post()
            .uri("/v1/api/users")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation(&body, field, code);
}

#[actix_web::test]
async fn malformed_json_becomes_validation_failure() {
    let (status, body) = call_command(
        MockUsersCommand::new(),
        actix_test::TestRequest::post()
            .uri("/v1/api/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation(&body, "body", "malformed_payload");
}

#[actix_web::test]
async fn edit_user_acknowledges_update() {
    let mut command = MockUsersCommand::new();
    command
        .expect_edit()
        .withf(|input| input.id == user_id(5) && input.patch.title.as_deref() == Some("Lead"))
        .times(1)
        .return_once(|_| Ok(()));

    let (status, body) = call_command(
        command,
        actix_test::TestRequest::put()
            .uri("/v1/api/users/5")
            .set_json(json!({"title": "Lead"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"code": 200, "msg": "update done"}));
}

#[actix_web::test]
async fn edit_user_with_empty_patch_is_rejected() {
    let (status, body) = call_command(
        MockUsersCommand::new(),
        actix_test::TestRequest::put()
            .uri("/v1/api/users/5")
            .set_json(json!({"title": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation(&body, "body", "empty_patch");
}

#[actix_web::test]
async fn edit_failure_is_reported() {
    let mut command = MockUsersCommand::new();
    command
        .expect_edit_status()
        .times(1)
        .return_once(|_| Err(Error::edit_failed()));

    let (status, body) = call_command(
        command,
        actix_test::TestRequest::put()
            .uri("/v1/api/users/5/status")
            .set_json(json!({"status": "disabled"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!(10003));
}

#[actix_web::test]
async fn edit_password_acknowledges_update() {
    let mut command = MockUsersCommand::new();
    command
        .expect_edit_password()
        .withf(|input| input.id == user_id(5) && input.password.expose() == "n3w-secret")
        .times(1)
        .return_once(|_| Ok(()));

    let (status, body) = call_command(
        command,
        actix_test::TestRequest::put()
            .uri("/v1/api/users/5/password")
            .set_json(json!({"password": "n3w-secret"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], json!("update done"));
}

#[actix_web::test]
async fn delete_user_acknowledges_removal() {
    let mut command = MockUsersCommand::new();
    command
        .expect_delete()
        .withf(|input| input.id == user_id(9))
        .times(1)
        .return_once(|_| Ok(()));

    let (status, body) = call_command(
        command,
        actix_test::TestRequest::delete().uri("/v1/api/users/9"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"code": 200, "msg": "deleted done"}));
}

#[actix_web::test]
async fn delete_of_non_positive_id_fails_without_port_call() {
    let (status, body) = call_command(
        MockUsersCommand::new(),
        actix_test::TestRequest::delete().uri("/v1/api/users/0"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!(10005));
}

#[actix_web::test]
async fn permissions_are_listed_under_result() {
    let mut query = MockUsersQuery::new();
    query
        .expect_permissions()
        .withf(|lookup| lookup.id == user_id(4))
        .times(1)
        .return_once(|_| Ok(vec![Permission::new("user:edit"), Permission::new("user:read")]));

    let (status, body) = call_query(
        query,
        actix_test::TestRequest::get().uri("/v1/api/users/4/permissions"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"result": ["user:edit", "user:read"]})
    );
}

#[rstest]
#[case(json!("2, 5,9,5"))]
#[case(json!([2, 5, 9]))]
#[actix_web::test]
async fn department_move_parses_ids(#[case] ids: Value) {
    let mut command = MockUsersCommand::new();
    command
        .expect_move_department()
        .withf(|input| {
            input.ids().iter().map(|id| id.get()).collect::<Vec<_>>() == vec![2, 5, 9]
                && input.department().as_str() == "eng"
        })
        .times(1)
        .return_once(|_| Ok(()));

    let (status, body) = call_command(
        command,
        actix_test::TestRequest::post()
            .uri("/v1/api/users/department/move")
            .set_json(json!({"ids": ids, "department": "eng"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], json!("update done"));
}

#[actix_web::test]
async fn department_move_failure_is_edit_failed() {
    let mut command = MockUsersCommand::new();
    command
        .expect_move_department()
        .times(1)
        .return_once(|_| Err(Error::edit_failed()));

    let (status, body) = call_command(
        command,
        actix_test::TestRequest::post()
            .uri("/v1/api/users/department/move")
            .set_json(json!({"ids": "1,2", "department": "eng"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!(10003));
}

#[rstest]
#[case(json!({"ids": "1,,2", "department": "eng"}), "ids", 1)]
#[case(json!({"ids": "1,x", "department": "eng"}), "ids", 1)]
#[case(json!({"ids": "0", "department": "eng"}), "ids", 0)]
#[actix_web::test]
async fn department_move_rejects_bad_tokens_before_any_port_call(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] index: u64,
) {
    let (status, body) = call_command(
        MockUsersCommand::new(),
        actix_test::TestRequest::post()
            .uri("/v1/api/users/department/move")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation(&body, field, "invalid_id_list");
    assert_eq!(body["details"]["index"], json!(index));
}

#[actix_web::test]
async fn department_move_requires_department() {
    let (status, body) = call_command(
        MockUsersCommand::new(),
        actix_test::TestRequest::post()
            .uri("/v1/api/users/department/move")
            .set_json(json!({"ids": "1,2"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_validation(&body, "department", "missing_field");
}
