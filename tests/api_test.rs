//! Integration tests for API endpoints.
//!
//! Every test runs the full router against its own SQLite database file and
//! upload directory inside a temporary directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use sea_orm::ConnectionTrait;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use user_profile_api::api::{create_router, AppState};
use user_profile_api::config::Config;
use user_profile_api::infra::Database;
use user_profile_api::UserResponse;

const BOUNDARY: &str = "user-profile-api-test-boundary";

// =============================================================================
// Test Helpers
// =============================================================================

struct TestApp {
    router: Router,
    database: Arc<Database>,
    upload_dir: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    async fn spawn() -> Self {
        let dir = TempDir::new().unwrap();
        let config = Config {
            database_url: format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display()),
            upload_dir: dir.path().join("uploads").join("profile_pictures"),
            ..Config::default()
        };

        let database = Arc::new(Database::connect(&config.database_url).await.unwrap());
        let router = create_router(AppState::from_config(database.clone(), &config));

        Self {
            router,
            database,
            upload_dir: config.upload_dir,
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn register(&self, name: &str, email: &str, phone: &str, picture: &[u8]) -> StatusCode {
        let fields = [
            ("full_name", name),
            ("email", email),
            ("password", "plain-password"),
            ("phone", phone),
        ];
        let (status, _) = self
            .send(multipart_request(Method::POST, "/register/", &fields, Some(picture)))
            .await;
        status
    }

    async fn update(&self, user_id: i32, form: &str) -> (StatusCode, Value) {
        let request = Request::put(format!("/user/{}/update/", user_id))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn update_photo(&self, user_id: i32, picture: &[u8]) -> (StatusCode, Value) {
        let uri = format!("/user/{}/update-profile-photo/", user_id);
        self.send(multipart_request(Method::PUT, &uri, &[], Some(picture)))
            .await
    }

    async fn delete(&self, user_id: i32) -> (StatusCode, Value) {
        self.delete_raw(&format!("/user/{}/", user_id)).await
    }

    async fn delete_raw(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn fetch_user(&self, user_id: i32) -> UserResponse {
        let (status, body) = self.get(&format!("/user/{}/", user_id)).await;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_value(body).unwrap()
    }

    /// Insert a user row without a profile, bypassing registration
    async fn insert_user_without_profile(&self, email: &str, phone: &str) {
        self.database
            .connection()
            .execute_unprepared(&format!(
                "INSERT INTO users (full_name, email, password, phone) \
                 VALUES ('No Photo', '{}', 'pw', '{}')",
                email, phone
            ))
            .await
            .unwrap();
    }
}

fn multipart_request(
    method: Method,
    uri: &str,
    fields: &[(&str, &str)],
    picture: Option<&[u8]>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = picture {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"profile_picture\"; \
                 filename=\"photo.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn emails(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_then_get_user() {
    let app = TestApp::spawn().await;

    let fields = [
        ("full_name", "Ada Lovelace"),
        ("email", "ada@example.com"),
        ("password", "plain-password"),
        ("phone", "555-0101"),
    ];
    let (status, body) = app
        .send(multipart_request(Method::POST, "/register/", &fields, Some(b"ada-jpeg")))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User registered successfully");

    let user = app.fetch_user(1).await;
    assert_eq!(user.id, 1);
    assert_eq!(user.full_name, "Ada Lovelace");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.phone, "555-0101");

    let picture = user.profile_picture.expect("profile picture path");
    assert_eq!(Path::new(&picture), app.upload_dir.join("profile_1.jpg"));
    assert_eq!(std::fs::read(&picture).unwrap(), b"ada-jpeg");
}

#[tokio::test]
async fn test_user_response_never_exposes_password() {
    let app = TestApp::spawn().await;
    app.register("Ada", "ada@example.com", "555-0101", b"jpeg")
        .await;

    let (_, body) = app.get("/user/1/").await;
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() {
    let app = TestApp::spawn().await;

    assert_eq!(
        app.register("Ada", "ada@example.com", "555-0101", b"a").await,
        StatusCode::OK
    );

    let fields = [
        ("full_name", "Impostor"),
        ("email", "ada@example.com"),
        ("password", "x"),
        ("phone", "555-0199"),
    ];
    let (status, body) = app
        .send(multipart_request(Method::POST, "/register/", &fields, Some(b"b")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email or phone already registered");

    // The rejected registration left nothing behind
    let (_, users) = app.get("/users/").await;
    assert_eq!(emails(&users), vec!["ada@example.com"]);
    assert!(!app.upload_dir.join("profile_2.jpg").exists());
}

#[tokio::test]
async fn test_register_duplicate_phone_rejected() {
    let app = TestApp::spawn().await;

    app.register("Ada", "ada@example.com", "555-0101", b"a")
        .await;
    let status = app
        .register("Grace", "grace@example.com", "555-0101", b"b")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_requires_picture() {
    let app = TestApp::spawn().await;

    let fields = [
        ("full_name", "Ada"),
        ("email", "ada@example.com"),
        ("password", "pw"),
        ("phone", "555-0101"),
    ];
    let (status, body) = app
        .send(multipart_request(Method::POST, "/register/", &fields, None))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "profile_picture is required");
}

#[tokio::test]
async fn test_register_requires_every_field() {
    let app = TestApp::spawn().await;

    let fields = [("full_name", "Ada"), ("email", "ada@example.com")];
    let (status, _) = app
        .send(multipart_request(Method::POST, "/register/", &fields, Some(b"a")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, users) = app.get("/users/").await;
    assert!(users.as_array().unwrap().is_empty());
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_get_unknown_user_returns_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/user/42/").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
async fn test_list_users_paginates_in_insertion_order() {
    let app = TestApp::spawn().await;
    app.register("One", "one@example.com", "555-0001", b"1").await;
    app.register("Two", "two@example.com", "555-0002", b"2").await;
    app.register("Three", "three@example.com", "555-0003", b"3")
        .await;

    let (status, first) = app.get("/users/?skip=0&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(emails(&first), vec!["one@example.com", "two@example.com"]);

    let (_, rest) = app.get("/users/?skip=2&limit=2").await;
    assert_eq!(emails(&rest), vec!["three@example.com"]);
    assert!(rest[0]["profile_picture"].is_string());

    let (_, all) = app.get("/users/").await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_users_shows_null_picture_without_profile() {
    let app = TestApp::spawn().await;
    app.insert_user_without_profile("bare@example.com", "555-0900")
        .await;

    let (_, users) = app.get("/users/").await;

    assert_eq!(emails(&users), vec!["bare@example.com"]);
    assert!(users[0]["profile_picture"].is_null());
}

#[tokio::test]
async fn test_list_users_returns_more_than_one_hundred() {
    let app = TestApp::spawn().await;
    for i in 0..105 {
        app.insert_user_without_profile(&format!("user{}@example.com", i), &format!("555-{:04}", i))
            .await;
    }

    let (status, users) = app.get("/users/?skip=0&limit=105").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 105);

    let (_, tail) = app.get("/users/?skip=100&limit=500").await;
    assert_eq!(tail.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_list_users_rejects_out_of_range_skip() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/users/?skip=18446744073709551615").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_list_users_rejects_negative_pagination() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/users/?skip=-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "skip must not be negative");

    let (status, body) = app.get("/users/?limit=-3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "limit must not be negative");
}

#[tokio::test]
async fn test_non_numeric_user_id_returns_json_error() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/user/abc/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, body) = app.delete_raw("/user/abc/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

// =============================================================================
// Updates
// =============================================================================

#[tokio::test]
async fn test_update_user_overwrites_all_fields() {
    let app = TestApp::spawn().await;
    app.register("Ada", "ada@example.com", "555-0101", b"a").await;

    let (status, body) = app
        .update(
            1,
            "full_name=Ada+King&email=countess%40example.com&password=new-secret&phone=555-0202",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User details updated successfully");

    let user = app.fetch_user(1).await;
    assert_eq!(user.full_name, "Ada King");
    assert_eq!(user.email, "countess@example.com");
    assert_eq!(user.phone, "555-0202");
    assert!(user.profile_picture.is_some());
}

#[tokio::test]
async fn test_update_unknown_user_returns_not_found() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .update(7, "full_name=X&email=x%40example.com&password=p&phone=1")
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_rejects_empty_field() {
    let app = TestApp::spawn().await;
    app.register("Ada", "ada@example.com", "555-0101", b"a").await;

    let (status, body) = app
        .update(1, "full_name=&email=ada%40example.com&password=p&phone=555-0101")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "full_name is required");
}

#[tokio::test]
async fn test_update_colliding_email_is_a_conflict() {
    let app = TestApp::spawn().await;
    app.register("Ada", "ada@example.com", "555-0101", b"a").await;
    app.register("Grace", "grace@example.com", "555-0102", b"g")
        .await;

    let (status, body) = app
        .update(2, "full_name=Grace&email=ada%40example.com&password=p&phone=555-0102")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email or phone already registered");
    assert_eq!(app.fetch_user(2).await.email, "grace@example.com");
}

#[tokio::test]
async fn test_update_photo_replaces_file() {
    let app = TestApp::spawn().await;
    app.register("Ada", "ada@example.com", "555-0101", b"old-picture")
        .await;
    let old_path = app.fetch_user(1).await.profile_picture.unwrap();

    let (status, body) = app.update_photo(1, b"new-picture").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile picture updated successfully");

    let new_path = app.fetch_user(1).await.profile_picture.unwrap();
    assert_eq!(new_path, old_path);
    assert_eq!(std::fs::read(&new_path).unwrap(), b"new-picture");

    let stored: Vec<_> = std::fs::read_dir(&app.upload_dir).unwrap().collect();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_update_photo_creates_missing_profile() {
    let app = TestApp::spawn().await;
    app.insert_user_without_profile("bare@example.com", "555-0900")
        .await;
    assert!(app.fetch_user(1).await.profile_picture.is_none());

    let (status, _) = app.update_photo(1, b"first-picture").await;
    assert_eq!(status, StatusCode::OK);

    let path = app.fetch_user(1).await.profile_picture.unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"first-picture");
}

#[tokio::test]
async fn test_update_photo_unknown_user_returns_not_found() {
    let app = TestApp::spawn().await;

    let (status, _) = app.update_photo(5, b"jpeg").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!app.upload_dir.join("profile_5.jpg").exists());
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
async fn test_delete_user_removes_record_and_file() {
    let app = TestApp::spawn().await;
    app.register("Ada", "ada@example.com", "555-0101", b"a").await;
    let picture = app.fetch_user(1).await.profile_picture.unwrap();
    assert!(Path::new(&picture).exists());

    let (status, body) = app.delete(1).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (status, _) = app.get("/user/1/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!Path::new(&picture).exists());
}

#[tokio::test]
async fn test_delete_user_with_missing_file_still_succeeds() {
    let app = TestApp::spawn().await;
    app.register("Ada", "ada@example.com", "555-0101", b"a").await;
    std::fs::remove_file(app.upload_dir.join("profile_1.jpg")).unwrap();

    let (status, _) = app.delete(1).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_user_without_profile() {
    let app = TestApp::spawn().await;
    app.insert_user_without_profile("bare@example.com", "555-0900")
        .await;

    let (status, _) = app.delete(1).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get("/user/1/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_user_returns_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = app.delete(3).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User not found");
}

#[tokio::test]
async fn test_deleted_identity_can_register_again() {
    let app = TestApp::spawn().await;
    app.register("Ada", "ada@example.com", "555-0101", b"a").await;
    app.delete(1).await;

    let status = app
        .register("Ada", "ada@example.com", "555-0101", b"again")
        .await;

    assert_eq!(status, StatusCode::OK);
}

// =============================================================================
// Operational endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document_lists_user_routes() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get("/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    for path in [
        "/register/",
        "/users/",
        "/user/{user_id}/",
        "/user/{user_id}/update/",
        "/user/{user_id}/update-profile-photo/",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
}
