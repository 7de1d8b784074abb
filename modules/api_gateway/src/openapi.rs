use utoipa::OpenApi;

/// Aggregated OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster API",
        description = "In-memory user roster CRUD API",
        version = "0.1.0"
    ),
    paths(
        users::api::rest::handlers::list_users,
        users::api::rest::handlers::get_user,
        users::api::rest::handlers::create_user,
        users::api::rest::handlers::update_user,
        users::api::rest::handlers::delete_user,
    ),
    components(schemas(
        users::api::rest::dto::UserDto,
        users::api::rest::dto::CreateUserReq,
        users::api::rest::dto::UpdateUserReq,
        users::api::rest::error::ErrorBody,
    )),
    tags((name = "users", description = "User record management"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_all_user_operations() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();

        assert!(doc["paths"]["/api/users"]["get"].is_object());
        assert!(doc["paths"]["/api/users"]["post"].is_object());
        assert!(doc["paths"]["/api/users/{id}"]["get"].is_object());
        assert!(doc["paths"]["/api/users/{id}"]["patch"].is_object());
        assert!(doc["paths"]["/api/users/{id}"]["delete"].is_object());

        assert!(doc["components"]["schemas"]["UserDto"].is_object());
    }
}
