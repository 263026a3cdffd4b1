//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::user_handler;
use crate::domain::UserResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the User Profile API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Profile API",
        version = "0.1.0",
        description = "User accounts with profile pictures, backed by SeaORM and local file storage",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        user_handler::register_user,
        user_handler::get_user,
        user_handler::list_users,
        user_handler::update_user,
        user_handler::update_profile_photo,
        user_handler::delete_user,
    ),
    components(
        schemas(
            UserResponse,
            MessageResponse,
            user_handler::RegisterUserForm,
            user_handler::RegisterUserUpload,
            user_handler::UpdateUserForm,
            user_handler::ProfilePhotoForm,
        )
    )
)]
pub struct ApiDoc;
