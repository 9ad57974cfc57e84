//! OpenAPI schema definitions for domain types and response envelopes.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror the JSON the handlers actually emit and live in the
//! inbound adapter layer where framework concerns belong.

use serde_json::Value;
use utoipa::ToSchema;

/// OpenAPI schema for the failure envelope.
#[derive(ToSchema)]
#[schema(as = Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Numeric failure code, e.g. `10004` for an unknown user.
    #[schema(example = 10004)]
    code: u32,
    /// Human-readable message.
    #[schema(example = "user does not exist")]
    msg: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(rename = "traceId", example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Offending field and machine code for validation failures.
    details: Option<Value>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = User, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    #[schema(example = 42)]
    id: i64,
    #[schema(example = "wutong")]
    username: String,
    real_name: Option<String>,
    email: Option<String>,
    mobile: Option<String>,
    title: Option<String>,
    #[schema(example = "eng")]
    department_id: String,
    #[schema(example = "enabled")]
    status: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// `{"result": User}`.
#[derive(ToSchema)]
#[schema(as = UserResult)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserResultSchema {
    result: UserSchema,
}

/// `{"code": 200, "data": {"result": User}}`.
#[derive(ToSchema)]
#[schema(as = UserEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserEnvelopeSchema {
    #[schema(example = 200)]
    code: u32,
    data: UserResultSchema,
}

/// `{"result": [User], "total": N}`.
#[derive(ToSchema)]
#[schema(as = UserPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPageSchema {
    result: Vec<UserSchema>,
    /// Matching users across all pages.
    total: u64,
}

/// `{"code": 200, "data": {"result": [...], "total": N}}`.
#[derive(ToSchema)]
#[schema(as = UserPageEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserPageEnvelopeSchema {
    #[schema(example = 200)]
    code: u32,
    data: UserPageSchema,
}

/// `{"id": N}`.
#[derive(ToSchema)]
#[schema(as = CreatedUser)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreatedUserSchema {
    #[schema(example = 42)]
    id: i64,
}

/// `{"code": 200, "data": {"id": N}}`.
#[derive(ToSchema)]
#[schema(as = CreatedUserEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreatedUserEnvelopeSchema {
    #[schema(example = 200)]
    code: u32,
    data: CreatedUserSchema,
}

/// `{"result": ["user:read", ...]}`.
#[derive(ToSchema)]
#[schema(as = PermissionList)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PermissionListSchema {
    result: Vec<String>,
}

/// `{"code": 200, "data": {"result": [...]}}`.
#[derive(ToSchema)]
#[schema(as = PermissionListEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PermissionListEnvelopeSchema {
    #[schema(example = 200)]
    code: u32,
    data: PermissionListSchema,
}

/// `{"code": 200, "msg": "update done"}`.
#[derive(ToSchema)]
#[schema(as = Ack)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AckSchema {
    #[schema(example = 200)]
    code: u32,
    #[schema(example = "update done")]
    msg: String,
}
