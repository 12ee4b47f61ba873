use axum::http::StatusCode;
use pictale::api::{self, AppState};
use pictale::db::init_db;
use pictale::{Config, Repository};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    repo: Arc<Repository>,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let config = Config {
        port: 0,
        bind_addr: "127.0.0.1".parse().unwrap(),
        database_path: db_path,
        password_hash_iterations: 1,
        admin: None,
    };
    let app = api::create_router(AppState::new(repo.clone(), config));

    TestApp {
        app,
        repo,
        _temp: temp_dir,
    }
}

async fn request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Token {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            axum::body::Body::from(json.to_string())
        }
        None => axum::body::Body::empty(),
    };

    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &axum::Router, username: &str, password: &str) -> (i64, String) {
    let (status, body) = request(
        app,
        "POST",
        "/api/auth/register/",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    (
        body["user"]["id"].as_i64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_register_returns_user_and_token() {
    let t = setup_test_app().await;
    let (status, body) = request(
        &t.app,
        "POST",
        "/api/auth/register/",
        None,
        Some(json!({"username": "ada", "email": "ada@example.com", "password": "pw1"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["username"], "ada");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("password").is_none());
    assert_eq!(body["token"].as_str().unwrap().len(), 40);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let t = setup_test_app().await;
    register(&t.app, "ada", "pw1").await;

    let (status, body) = request(
        &t.app,
        "POST",
        "/api/auth/register/",
        None,
        Some(json!({"username": "ada", "email": "", "password": "pw2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A user with that username already exists.");
}

#[tokio::test]
async fn test_register_validates_fields() {
    let t = setup_test_app().await;
    for payload in [
        json!({"username": "has space", "password": "pw"}),
        json!({"username": "ada", "password": ""}),
        json!({"username": "ada", "email": "nope", "password": "pw"}),
    ] {
        let (status, _) = request(&t.app, "POST", "/api/auth/register/", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_login_reuses_token_and_records_login() {
    let t = setup_test_app().await;
    let (user_id, token) = register(&t.app, "ada", "pw1").await;

    let (status, body) = request(
        &t.app,
        "POST",
        "/api/auth/login/",
        None,
        Some(json!({"username": "ada", "password": "pw1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], token.as_str());
    assert_eq!(body["user_id"], user_id);
    assert_eq!(body["username"], "ada");

    let user = t.repo.get_user(user_id).await.unwrap().unwrap();
    assert!(user.last_login.is_some());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let t = setup_test_app().await;
    register(&t.app, "ada", "pw1").await;

    for (username, password) in [("ada", "wrong"), ("nobody", "pw1")] {
        let (status, body) = request(
            &t.app,
            "POST",
            "/api/auth/login/",
            None,
            Some(json!({"username": username, "password": password})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unable to log in with provided credentials.");
    }
}

#[tokio::test]
async fn test_logout_invalidates_token() {
    let t = setup_test_app().await;
    let (_, token) = register(&t.app, "ada", "pw1").await;

    let (status, body) = request(&t.app, "POST", "/api/auth/logout/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully logged out.");

    let (status, body) = request(&t.app, "GET", "/api/auth/profile/", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid token.");

    let (status, login) = request(
        &t.app,
        "POST",
        "/api/auth/login/",
        None,
        Some(json!({"username": "ada", "password": "pw1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_ne!(login["token"], token.as_str());
}

#[tokio::test]
async fn test_profile_read_and_update() {
    let t = setup_test_app().await;
    let (user_id, token) = register(&t.app, "ada", "pw1").await;

    let (status, body) = request(&t.app, "GET", "/api/auth/profile/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user_id);
    assert_eq!(body["username"], "ada");
    assert_eq!(body["bio"], Value::Null);

    let (status, body) = request(
        &t.app,
        "PATCH",
        "/api/auth/profile/",
        Some(&token),
        Some(json!({
            "first_name": "Ada",
            "bio": "Harbour photographer",
            "username": "ignored",
            "id": 999
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Ada");
    assert_eq!(body["bio"], "Harbour photographer");
    assert_eq!(body["username"], "ada");
    assert_eq!(body["id"], user_id);
    assert_eq!(body["email"], "ada@example.com");
}

#[tokio::test]
async fn test_profile_rejects_invalid_email() {
    let t = setup_test_app().await;
    let (_, token) = register(&t.app, "ada", "pw1").await;

    let (status, _) = request(
        &t.app,
        "PUT",
        "/api/auth/profile/",
        Some(&token),
        Some(json!({"email": "not-an-email"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_change_password() {
    let t = setup_test_app().await;
    let (_, token) = register(&t.app, "ada", "pw1").await;

    let (status, body) = request(
        &t.app,
        "POST",
        "/api/auth/change-password/",
        Some(&token),
        Some(json!({"old_password": "wrong", "new_password": "pw2"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "old_password: Wrong password.");

    let (status, _) = request(
        &t.app,
        "POST",
        "/api/auth/change-password/",
        Some(&token),
        Some(json!({"old_password": "pw1", "new_password": "pw2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request(
        &t.app,
        "POST",
        "/api/auth/login/",
        None,
        Some(json!({"username": "ada", "password": "pw1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(
        &t.app,
        "POST",
        "/api/auth/login/",
        None,
        Some(json!({"username": "ada", "password": "pw2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let t = setup_test_app().await;
    let req = axum::http::Request::builder()
        .method("GET")
        .uri("/api/auth/profile/")
        .header("Authorization", "Basic abc")
        .body(axum::body::Body::empty())
        .unwrap();
    let resp = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_account() {
    let t = setup_test_app().await;
    let (user_id, token) = register(&t.app, "ada", "pw1").await;
    let (_, bob) = register(&t.app, "bob", "pw2").await;

    let (status, photo) = request(
        &t.app,
        "POST",
        "/api/dailyphotos/",
        Some(&token),
        Some(json!({
            "title": "Harbour",
            "image": "daily_photos/harbour.jpg",
            "story": "Fog at dawn",
            "date_featured": "2024-03-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let photo_id = photo["id"].as_i64().unwrap();
    let photo_uri = format!("/api/dailyphotos/{}/", photo_id);

    for (uri, payload) in [
        ("/api/likes/like_photo/", json!({"photo_id": photo_id})),
        ("/api/savedphotos/save_photo/", json!({"photo_id": photo_id})),
        ("/api/comments/", json!({"photo_id": photo_id, "text": "Mine"})),
        ("/api/recommendations/", json!({"title": "Pier", "story": "At noon"})),
    ] {
        let (status, body) = request(&t.app, "POST", uri, Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED, "{}: {}", uri, body);
    }
    request(
        &t.app,
        "POST",
        "/api/comments/",
        Some(&bob),
        Some(json!({"photo_id": photo_id, "text": "Lovely"})),
    )
    .await;

    let (status, _) = request(&t.app, "DELETE", "/api/auth/profile/", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(t.repo.get_user(user_id).await.unwrap(), None);
    assert_eq!(t.repo.find_user_by_token(&token).await.unwrap(), None);
    assert!(t.repo.list_recommendations(Some(user_id)).await.unwrap().is_empty());
    assert!(t.repo.list_likes(Some(user_id), None).await.unwrap().is_empty());
    assert!(t
        .repo
        .list_saved_photos(Some(user_id), None)
        .await
        .unwrap()
        .is_empty());

    let (status, _) = request(&t.app, "GET", "/api/auth/profile/", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = request(&t.app, "GET", &photo_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author"], Value::Null);
    assert_eq!(body["likes"], json!([]));
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"], "Lovely");
}

#[tokio::test]
async fn test_incomplete_bodies_are_json_400() {
    let t = setup_test_app().await;

    let (status, body) = request(
        &t.app,
        "POST",
        "/api/auth/register/",
        None,
        Some(json!({"username": "bob"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("password"));

    let (status, body) = request(&t.app, "POST", "/api/auth/login/", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
