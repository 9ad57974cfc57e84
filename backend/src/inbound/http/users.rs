//! User resource handlers.
//!
//! ```text
//! GET    /v1/api/users?limit=20&offset=0&q=wu&status=enabled&department=eng
//! GET    /v1/api/users/{id}
//! POST   /v1/api/users {"username":"wutong","password":"s3cret-pass","departmentId":"eng"}
//! PUT    /v1/api/users/{id} {"title":"Lead"}
//! PUT    /v1/api/users/{id}/status {"status":"disabled"}
//! PUT    /v1/api/users/{id}/password {"password":"n3w-secret"}
//! DELETE /v1/api/users/{id}
//! GET    /v1/api/users/{id}/permissions
//! POST   /v1/api/users/department/move {"ids":"1,2,3","department":"eng"}
//! ```
//!
//! Every handler binds and validates first; a rejected request never reaches
//! a port. Otherwise it makes exactly one port call and renders either a
//! success envelope or the failure envelope.

use actix_web::{delete, get, post, put, web};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    DepartmentMoveInput, Error, IdentityLookup, ListQuery, Password, User, UserCreateInput,
    UserDeleteInput, UserEditInput, UserId, UserPasswordEditInput, UserPatch, UserSearch,
    UserStatus, UserStatusEditInput, Username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{Ack, CreatedUser, Envelope, PermissionList, UserResult};
use crate::inbound::http::schemas::{
    AckSchema, CreatedUserEnvelopeSchema, ErrorSchema, PermissionListEnvelopeSchema,
    UserEnvelopeSchema, UserPageEnvelopeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, empty_patch_error, parse_department_value, parse_existing_user_id,
    parse_optional_email, parse_optional_integer, parse_optional_mobile, parse_optional_text,
    parse_user_id, parse_user_id_list_value, require, user_field_error,
};

const ID: FieldName = FieldName::new("id");
const USERNAME: FieldName = FieldName::new("username");
const PASSWORD: FieldName = FieldName::new("password");
const DEPARTMENT_ID: FieldName = FieldName::new("departmentId");
const DEPARTMENT: FieldName = FieldName::new("department");
const IDS: FieldName = FieldName::new("ids");
const STATUS: FieldName = FieldName::new("status");
const REAL_NAME: FieldName = FieldName::new("realName");
const EMAIL: FieldName = FieldName::new("email");
const MOBILE: FieldName = FieldName::new("mobile");
const TITLE: FieldName = FieldName::new("title");
const LIMIT: FieldName = FieldName::new("limit");
const OFFSET: FieldName = FieldName::new("offset");

/// Query string accepted by `GET /v1/api/users`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Page size; clamped to 1..=100, default 20.
    pub limit: Option<String>,
    /// Rows to skip; negative values count as 0.
    pub offset: Option<String>,
    /// Case-insensitive text search.
    pub q: Option<String>,
    /// `enabled` or `disabled`.
    pub status: Option<String>,
    /// Department filter.
    pub department: Option<String>,
}

/// Body for `POST /v1/api/users`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Department as a string or integer.
    #[schema(value_type = Option<String>, example = "eng")]
    pub department_id: Option<Value>,
    pub real_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub title: Option<String>,
    /// `enabled` (default) or `disabled`.
    pub status: Option<String>,
}

/// Body for `PUT /v1/api/users/{id}`. At least one field must be present.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditUserRequest {
    pub username: Option<String>,
    #[schema(value_type = Option<String>, example = "eng")]
    pub department_id: Option<Value>,
    pub real_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub title: Option<String>,
}

/// Body for `PUT /v1/api/users/{id}/status`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct EditStatusRequest {
    #[schema(example = "disabled")]
    pub status: Option<String>,
}

/// Body for `PUT /v1/api/users/{id}/password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct EditPasswordRequest {
    pub password: Option<String>,
}

/// Body for `POST /v1/api/users/department/move`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct MoveDepartmentRequest {
    /// Comma-joined ids (`"1,2,3"`) or an integer array.
    #[schema(value_type = Option<String>, example = "1,2,3")]
    pub ids: Option<Value>,
    /// Target department as a string or integer.
    #[schema(value_type = Option<String>, example = "eng")]
    pub department: Option<Value>,
}

fn parse_username(raw: &str) -> Result<Username, Error> {
    Username::new(raw).map_err(|err| user_field_error(USERNAME, &err))
}

fn parse_password(raw: &str) -> Result<Password, Error> {
    Password::new(raw).map_err(|err| user_field_error(PASSWORD, &err))
}

fn parse_status(raw: &str) -> Result<UserStatus, Error> {
    raw.parse::<UserStatus>()
        .map_err(|err| user_field_error(STATUS, &err))
}

fn parse_optional_status(raw: Option<&str>) -> Result<Option<UserStatus>, Error> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(parse_status)
        .transpose()
}

fn parse_identity(raw: &str) -> Result<IdentityLookup, Error> {
    Ok(IdentityLookup {
        id: parse_user_id(raw, ID)?,
    })
}

fn parse_existing_identity(raw: &str) -> Result<IdentityLookup, Error> {
    Ok(IdentityLookup {
        id: parse_existing_user_id(raw, ID, Error::no_such_user)?,
    })
}

fn parse_list_params(params: ListUsersParams) -> Result<ListQuery, Error> {
    let limit = parse_optional_integer(params.limit.as_deref(), LIMIT)?;
    let offset = parse_optional_integer(params.offset.as_deref(), OFFSET)?;
    let status = parse_optional_status(params.status.as_deref())?;
    let department = params
        .department
        .filter(|value| !value.trim().is_empty())
        .map(|value| parse_department_value(Value::String(value), DEPARTMENT))
        .transpose()?;
    let q = parse_optional_text(params.q, FieldName::new("q"))?;
    Ok(ListQuery {
        page: PageRequest::clamped(limit, offset),
        search: UserSearch {
            q,
            status,
            department,
        },
    })
}

fn parse_create_request(payload: CreateUserRequest) -> Result<UserCreateInput, Error> {
    let username = parse_username(&require(payload.username, USERNAME)?)?;
    let password = parse_password(&require(payload.password, PASSWORD)?)?;
    let department_id =
        parse_department_value(require(payload.department_id, DEPARTMENT_ID)?, DEPARTMENT_ID)?;
    let status = parse_optional_status(payload.status.as_deref())?.unwrap_or_default();
    Ok(UserCreateInput {
        username,
        password,
        department_id,
        real_name: parse_optional_text(payload.real_name, REAL_NAME)?,
        email: parse_optional_email(payload.email, EMAIL)?,
        mobile: parse_optional_mobile(payload.mobile, MOBILE)?,
        title: parse_optional_text(payload.title, TITLE)?,
        status,
    })
}

fn parse_edit_request(raw_id: &str, payload: EditUserRequest) -> Result<UserEditInput, Error> {
    let id = parse_user_id(raw_id, ID)?;
    let patch = UserPatch {
        username: payload.username.as_deref().map(parse_username).transpose()?,
        real_name: parse_optional_text(payload.real_name, REAL_NAME)?,
        email: parse_optional_email(payload.email, EMAIL)?,
        mobile: parse_optional_mobile(payload.mobile, MOBILE)?,
        title: parse_optional_text(payload.title, TITLE)?,
        department_id: payload
            .department_id
            .map(|value| parse_department_value(value, DEPARTMENT_ID))
            .transpose()?,
    };
    if patch.is_empty() {
        return Err(empty_patch_error());
    }
    Ok(UserEditInput { id, patch })
}

fn parse_status_request(
    raw_id: &str,
    payload: EditStatusRequest,
) -> Result<UserStatusEditInput, Error> {
    let id = parse_user_id(raw_id, ID)?;
    let status = parse_status(&require(payload.status, STATUS)?)?;
    Ok(UserStatusEditInput { id, status })
}

fn parse_password_request(
    raw_id: &str,
    payload: EditPasswordRequest,
) -> Result<UserPasswordEditInput, Error> {
    let id = parse_user_id(raw_id, ID)?;
    let password = parse_password(&require(payload.password, PASSWORD)?)?;
    Ok(UserPasswordEditInput { id, password })
}

fn parse_move_request(payload: MoveDepartmentRequest) -> Result<DepartmentMoveInput, Error> {
    let ids: Vec<UserId> = parse_user_id_list_value(require(payload.ids, IDS)?, IDS)?;
    let department = parse_department_value(require(payload.department, DEPARTMENT)?, DEPARTMENT)?;
    DepartmentMoveInput::new(ids, department)
        .map_err(|err| Error::validation_failed(err.to_string()))
}

/// List users with pagination and optional filters.
#[utoipa::path(
    get,
    path = "/v1/api/users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "Page of users", body = UserPageEnvelopeSchema),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    params: web::Query<ListUsersParams>,
) -> ApiResult<web::Json<Envelope<Page<User>>>> {
    let query = parse_list_params(params.into_inner())?;
    let page = state.users.list(query).await?;
    Ok(web::Json(Envelope::new(page)))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/v1/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserEnvelopeSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "No such user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<UserResult>>> {
    let lookup = parse_existing_identity(&path)?;
    let user = state.users.get(lookup).await?;
    Ok(web::Json(Envelope::new(UserResult { result: user })))
}

/// Create a user and return its identifier.
#[utoipa::path(
    post,
    path = "/v1/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User created", body = CreatedUserEnvelopeSchema),
        (status = 400, description = "Invalid request or creation failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<web::Json<Envelope<CreatedUser>>> {
    let input = parse_create_request(payload.into_inner())?;
    let id = state.users_command.create(input).await?;
    Ok(web::Json(Envelope::new(CreatedUser { id })))
}

/// Edit profile fields of one user.
#[utoipa::path(
    put,
    path = "/v1/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = EditUserRequest,
    responses(
        (status = 200, description = "Updated", body = AckSchema),
        (status = 400, description = "Invalid request or edit failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "editUser"
)]
#[put("/users/{id}")]
pub async fn edit_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<EditUserRequest>,
) -> ApiResult<web::Json<Ack>> {
    let input = parse_edit_request(&path, payload.into_inner())?;
    state.users_command.edit(input).await?;
    Ok(web::Json(Ack::update_done()))
}

/// Enable or disable one user.
#[utoipa::path(
    put,
    path = "/v1/api/users/{id}/status",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = EditStatusRequest,
    responses(
        (status = 200, description = "Updated", body = AckSchema),
        (status = 400, description = "Invalid request or edit failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "editUserStatus"
)]
#[put("/users/{id}/status")]
pub async fn edit_user_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<EditStatusRequest>,
) -> ApiResult<web::Json<Ack>> {
    let input = parse_status_request(&path, payload.into_inner())?;
    state.users_command.edit_status(input).await?;
    Ok(web::Json(Ack::update_done()))
}

/// Replace the credential of one user.
#[utoipa::path(
    put,
    path = "/v1/api/users/{id}/password",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = EditPasswordRequest,
    responses(
        (status = 200, description = "Updated", body = AckSchema),
        (status = 400, description = "Invalid request or edit failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "editUserPassword"
)]
#[put("/users/{id}/password")]
pub async fn edit_user_password(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<EditPasswordRequest>,
) -> ApiResult<web::Json<Ack>> {
    let input = parse_password_request(&path, payload.into_inner())?;
    state.users_command.edit_password(input).await?;
    Ok(web::Json(Ack::update_done()))
}

/// Delete one user.
#[utoipa::path(
    delete,
    path = "/v1/api/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deleted", body = AckSchema),
        (status = 400, description = "Invalid identifier or delete failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Ack>> {
    let id = parse_existing_user_id(&path, ID, Error::delete_failed)?;
    state.users_command.delete(UserDeleteInput { id }).await?;
    Ok(web::Json(Ack::deleted_done()))
}

/// List the permission codes granted to one user.
#[utoipa::path(
    get,
    path = "/v1/api/users/{id}/permissions",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Permissions", body = PermissionListEnvelopeSchema),
        (status = 400, description = "Invalid identifier", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUserPermissions"
)]
#[get("/users/{id}/permissions")]
pub async fn get_user_permissions(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Envelope<PermissionList>>> {
    let lookup = parse_identity(&path)?;
    let result = state.users.permissions(lookup).await?;
    Ok(web::Json(Envelope::new(PermissionList { result })))
}

/// Move several users into one department, all or nothing.
#[utoipa::path(
    post,
    path = "/v1/api/users/department/move",
    request_body = MoveDepartmentRequest,
    responses(
        (status = 200, description = "Every user moved", body = AckSchema),
        (status = 400, description = "Invalid request or move failed", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "moveUsersDepartment"
)]
#[post("/users/department/move")]
pub async fn move_users_department(
    state: web::Data<HttpState>,
    payload: web::Json<MoveDepartmentRequest>,
) -> ApiResult<web::Json<Ack>> {
    let input = parse_move_request(payload.into_inner())?;
    state.users_command.move_department(input).await?;
    Ok(web::Json(Ack::update_done()))
}

/// Register the user routes under `/v1/api`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use zeus_backend::inbound::http::users;
///
/// let app = App::new().configure(users::configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1/api")
            .service(move_users_department)
            .service(list_users)
            .service(create_user)
            .service(get_user_permissions)
            .service(edit_user_status)
            .service(edit_user_password)
            .service(get_user)
            .service(edit_user)
            .service(delete_user),
    );
}

#[cfg(test)]
mod tests;
