//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every user endpoint and health probe together with
//! the schema wrappers from [`crate::inbound::http::schemas`], so domain
//! types stay free of utoipa derives. Swagger UI serves it at `/docs` in
//! debug builds.

use crate::inbound::http::schemas::{
    AckSchema, CreatedUserEnvelopeSchema, CreatedUserSchema, ErrorSchema,
    PermissionListEnvelopeSchema, PermissionListSchema, UserEnvelopeSchema, UserPageEnvelopeSchema,
    UserPageSchema, UserResultSchema, UserSchema,
};
use crate::inbound::http::users::{
    CreateUserRequest, EditPasswordRequest, EditStatusRequest, EditUserRequest,
    MoveDepartmentRequest,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Zeus user administration API",
        description = "User resource endpoints of the admin backend, plus health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::edit_user,
        crate::inbound::http::users::edit_user_status,
        crate::inbound::http::users::edit_user_password,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::get_user_permissions,
        crate::inbound::http::users::move_users_department,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        UserSchema,
        UserResultSchema,
        UserEnvelopeSchema,
        UserPageSchema,
        UserPageEnvelopeSchema,
        CreatedUserSchema,
        CreatedUserEnvelopeSchema,
        PermissionListSchema,
        PermissionListEnvelopeSchema,
        AckSchema,
        CreateUserRequest,
        EditUserRequest,
        EditStatusRequest,
        EditPasswordRequest,
        MoveDepartmentRequest,
    )),
    tags(
        (name = "users", description = "User administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("/v1/api/users")]
    #[case("/v1/api/users/{id}")]
    #[case("/v1/api/users/{id}/status")]
    #[case("/v1/api/users/{id}/password")]
    #[case("/v1/api/users/{id}/permissions")]
    #[case("/v1/api/users/department/move")]
    #[case("/health/ready")]
    fn every_endpoint_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[test]
    fn error_schema_matches_failure_envelope() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "msg");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[test]
    fn user_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let user_schema = schemas.get("User").expect("User schema");

        assert_object_schema_has_field(user_schema, "departmentId");
        assert_object_schema_has_field(user_schema, "status");
    }
}
