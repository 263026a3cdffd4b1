//! User handlers.

use axum::{
    extract::{DefaultBodyLimit, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{
    PathParam, PhotoUpload, RegistrationUpload, ValidatedForm, ValidatedQuery,
};
use crate::api::AppState;
use crate::config::{MSG_PICTURE_UPDATED, MSG_USER_DELETED, MSG_USER_REGISTERED, MSG_USER_UPDATED};
use crate::domain::{NewUser, UpdateUser, UserResponse};
use crate::errors::AppResult;
use crate::types::{MessageResponse, PaginationParams};

/// Text fields of the registration form.
///
/// Every field must be non-empty; an empty value is rejected with 400.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserForm {
    #[validate(length(min = 1, message = "full_name is required"))]
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[validate(length(min = 1, message = "email is required"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(example = "hunter22")]
    pub password: String,
    #[validate(length(min = 1, message = "phone is required"))]
    #[schema(example = "+15550100")]
    pub phone: String,
}

/// Full multipart body of a registration, for documentation only
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RegisterUserUpload {
    #[schema(example = "John Doe")]
    full_name: String,
    #[schema(example = "user@example.com")]
    email: String,
    password: String,
    #[schema(example = "+15550100")]
    phone: String,
    /// Picture file, stored as-is
    #[schema(value_type = String, format = Binary)]
    profile_picture: Vec<u8>,
}

/// User details update form (application/x-www-form-urlencoded).
///
/// All four fields are overwritten, so each must be present and non-empty.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserForm {
    #[validate(length(min = 1, message = "full_name is required"))]
    #[schema(example = "Jane Doe")]
    pub full_name: String,
    #[validate(length(min = 1, message = "email is required"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "phone is required"))]
    #[schema(example = "+15550199")]
    pub phone: String,
}

/// Profile photo upload body, for documentation only
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProfilePhotoForm {
    #[schema(value_type = String, format = Binary)]
    profile_picture: Vec<u8>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register_user))
        .route("/users/", get(list_users))
        .route("/user/:user_id/", get(get_user).delete(delete_user))
        .route("/user/:user_id/update/", put(update_user))
        .route(
            "/user/:user_id/update-profile-photo/",
            put(update_profile_photo),
        )
        // Uploads are stored without a size limit
        .layer(DefaultBodyLimit::disable())
}

/// Register a new user with a profile picture
#[utoipa::path(
    post,
    path = "/register/",
    tag = "Register New User.",
    request_body(content = RegisterUserUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "User registered", body = MessageResponse),
        (status = 400, description = "Email or phone already registered, or invalid form")
    )
)]
pub async fn register_user(
    State(state): State<AppState>,
    upload: RegistrationUpload<RegisterUserForm>,
) -> AppResult<Json<MessageResponse>> {
    let form = upload.fields;
    let new_user = NewUser {
        full_name: form.full_name,
        email: form.email,
        password: form.password,
        phone: form.phone,
    };

    state
        .user_service
        .register(new_user, upload.picture)
        .await?;

    Ok(Json(MessageResponse::new(MSG_USER_REGISTERED)))
}

/// Get a single user
#[utoipa::path(
    get,
    path = "/user/{user_id}/",
    tag = "Get Single User.",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i32>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// List users with offset pagination
#[utoipa::path(
    get,
    path = "/users/",
    tag = "Get All Users.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of users", body = Vec<UserResponse>),
        (status = 400, description = "Negative or out-of-range skip or limit")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PaginationParams>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users(params).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Overwrite all user details
#[utoipa::path(
    put,
    path = "/user/{user_id}/update/",
    tag = "Update the User Details.",
    params(("user_id" = i32, Path, description = "User ID")),
    request_body(content = UpdateUserForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Invalid form or value already taken"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i32>,
    ValidatedForm(form): ValidatedForm<UpdateUserForm>,
) -> AppResult<Json<MessageResponse>> {
    let changes = UpdateUser {
        full_name: form.full_name,
        email: form.email,
        password: form.password,
        phone: form.phone,
    };

    state.user_service.update_user(user_id, changes).await?;

    Ok(Json(MessageResponse::new(MSG_USER_UPDATED)))
}

/// Replace the profile picture
#[utoipa::path(
    put,
    path = "/user/{user_id}/update-profile-photo/",
    tag = "Update the Profile Photo.",
    params(("user_id" = i32, Path, description = "User ID")),
    request_body(content = ProfilePhotoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Picture replaced", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile_photo(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i32>,
    PhotoUpload(picture): PhotoUpload,
) -> AppResult<Json<MessageResponse>> {
    state
        .user_service
        .update_profile_photo(user_id, picture)
        .await?;

    Ok(Json(MessageResponse::new(MSG_PICTURE_UPDATED)))
}

/// Delete a user with its profile and picture
#[utoipa::path(
    delete,
    path = "/user/{user_id}/",
    tag = "Delete User.",
    params(("user_id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.user_service.delete_user(user_id).await?;
    Ok(Json(MessageResponse::new(MSG_USER_DELETED)))
}
