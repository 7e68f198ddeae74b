//! End-to-end tests for the HTTP surface
//!
//! The real router runs against in-memory store implementations, so the
//! suite needs no live Postgres, Redis, or S3.

use anyhow::Result;
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use api::config::AppConfig;
use api::image_store::ImageStore;
use api::models::{NewUser, User, Vinyl, VinylPayload};
use api::repositories::{UserStore, VinylStore};
use api::routes::create_router;
use api::session::{InMemorySessionStore, SessionStore, generate_token};
use api::state::AppState;

#[derive(Default)]
struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn insert(&self, new_user: &NewUser) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            email: new_user.email.clone(),
            user_name: new_user.user_name.clone(),
            password_hash: new_user.password_hash.clone(),
            is_admin: new_user.is_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Default)]
struct InMemoryVinyls {
    vinyls: Mutex<Vec<Vinyl>>,
}

fn apply_payload(id: Uuid, payload: &VinylPayload) -> Vinyl {
    Vinyl {
        id,
        vinyl_cover: payload.vinyl_cover.clone(),
        vinyl_version: payload.vinyl_version.clone(),
        album: payload.album.clone(),
        artist: payload.artist.clone(),
        songs: payload.songs,
        upc: payload.upc,
    }
}

#[async_trait]
impl VinylStore for InMemoryVinyls {
    async fn list(&self) -> Result<Vec<Vinyl>> {
        Ok(self.vinyls.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vinyl>> {
        let vinyls = self.vinyls.lock().unwrap();
        Ok(vinyls.iter().find(|v| v.id == id).cloned())
    }

    async fn insert(&self, payload: &VinylPayload) -> Result<Vinyl> {
        let vinyl = apply_payload(Uuid::new_v4(), payload);
        self.vinyls.lock().unwrap().push(vinyl.clone());
        Ok(vinyl)
    }

    async fn update(&self, id: Uuid, payload: &VinylPayload) -> Result<Option<Vinyl>> {
        let mut vinyls = self.vinyls.lock().unwrap();
        match vinyls.iter_mut().find(|v| v.id == id) {
            Some(existing) => {
                *existing = apply_payload(id, payload);
                Ok(Some(existing.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut vinyls = self.vinyls.lock().unwrap();
        let before = vinyls.len();
        vinyls.retain(|v| v.id != id);
        Ok(vinyls.len() < before)
    }
}

#[derive(Default)]
struct RecordingImages {
    puts: Mutex<Vec<(String, String, usize)>>,
}

#[async_trait]
impl ImageStore for RecordingImages {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        self.puts
            .lock()
            .unwrap()
            .push((key.to_string(), content_type.to_string(), bytes.len()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://test-bucket.s3.us-west-2.amazonaws.com/{}", key)
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    users: Arc<InMemoryUsers>,
    vinyls: Arc<InMemoryVinyls>,
    images: Arc<RecordingImages>,
}

fn test_app() -> TestApp {
    let users = Arc::new(InMemoryUsers::default());
    let vinyls = Arc::new(InMemoryVinyls::default());
    let images = Arc::new(RecordingImages::default());

    let config = AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        cookie_name: "disclist_session".to_string(),
        session_ttl_seconds: 3600,
        bucket_name: "test-bucket".to_string(),
        region: "us-west-2".to_string(),
    };

    let state = AppState {
        config,
        users: users.clone(),
        vinyls: vinyls.clone(),
        sessions: Arc::new(InMemorySessionStore::new(Duration::from_secs(3600))),
        images: images.clone(),
    };

    TestApp {
        router: create_router(state.clone()),
        state,
        users,
        vinyls,
        images,
    }
}

impl TestApp {
    /// Insert a user directly and open a session for them, bypassing the
    /// login flow. Returns the Cookie header value.
    async fn session_cookie(&self, is_admin: bool) -> String {
        let user = self
            .users
            .insert(&NewUser {
                first_name: "Test".to_string(),
                last_name: if is_admin { "Admin" } else { "User" }.to_string(),
                email: format!("{}@test.com", Uuid::new_v4()),
                user_name: "tester".to_string(),
                password_hash: "unused".to_string(),
                is_admin,
            })
            .await
            .unwrap();

        let token = generate_token();
        self.state.sessions.set(&token, user.id).await.unwrap();
        format!("disclist_session={}", token)
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn vinyl_body(album: &str, artist: &str) -> Value {
    json!({
        "vinylCover": "https://covers.test/c.png",
        "vinylVersion": "First pressing",
        "album": album,
        "artist": artist,
        "songs": 12,
        "upc": 602577915079i64
    })
}

#[tokio::test]
async fn test_unauthenticated_create_is_rejected_and_store_unchanged() {
    let app = test_app();

    let (status, body) = app
        .send(json_request("POST", "/vinyls", None, &vinyl_body("A", "B")))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
    assert!(app.vinyls.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_non_admin_create_is_forbidden() {
    let app = test_app();
    let cookie = app.session_cookie(false).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/vinyls",
            Some(&cookie),
            &vinyl_body("A", "B"),
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthorized: Admin access required");
    assert!(app.vinyls.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_missing_album_reports_field_errors() {
    let app = test_app();
    let cookie = app.session_cookie(true).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/vinyls",
            Some(&cookie),
            &json!({"artist": "Joni Mitchell"}),
        ))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.get("album").is_some());
    assert!(body.get("artist").is_none());
}

#[tokio::test]
async fn test_admin_create_and_public_list() {
    let app = test_app();
    let cookie = app.session_cookie(true).await;

    let (status, body) = app
        .send(json_request(
            "POST",
            "/vinyls",
            Some(&cookie),
            &vinyl_body("Abbey Road", "The Beatles"),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["vinyl"]["album"], "Abbey Road");

    // Listing is public and reflects the new record.
    let (status, body) = app.send(bare_request("GET", "/vinyls", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["artist"], "The Beatles");
}

#[tokio::test]
async fn test_update_overwrites_every_field() {
    let app = test_app();
    let cookie = app.session_cookie(true).await;

    let (_, created) = app
        .send(json_request(
            "POST",
            "/vinyls",
            Some(&cookie),
            &vinyl_body("Abbey Road", "The Beatles"),
        ))
        .await;
    let id = created["vinyl"]["id"].as_str().unwrap().to_string();

    // The payload omits cover, version, and upc; the update must not keep
    // the old values for them.
    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/vinyls/{}", id),
            Some(&cookie),
            &json!({"album": "Let It Be", "artist": "The Beatles", "songs": 12}),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vinyl"]["album"], "Let It Be");
    assert_eq!(body["vinyl"]["vinylCover"], Value::Null);
    assert_eq!(body["vinyl"]["vinylVersion"], Value::Null);
    assert_eq!(body["vinyl"]["upc"], Value::Null);

    let (_, listed) = app.send(bare_request("GET", "/vinyls", None)).await;
    assert_eq!(listed[0]["album"], "Let It Be");
    assert_eq!(listed[0]["vinylCover"], Value::Null);
}

#[tokio::test]
async fn test_update_missing_vinyl_is_404() {
    let app = test_app();
    let cookie = app.session_cookie(true).await;

    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/vinyls/{}", Uuid::new_v4()),
            Some(&cookie),
            &vinyl_body("A", "B"),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vinyl not found");
}

#[tokio::test]
async fn test_update_missing_vinyl_with_invalid_payload_is_404() {
    let app = test_app();
    let cookie = app.session_cookie(true).await;

    // The unknown id wins over the invalid body.
    let (status, body) = app
        .send(json_request(
            "PUT",
            &format!("/vinyls/{}", Uuid::new_v4()),
            Some(&cookie),
            &json!({"artist": "Joni Mitchell"}),
        ))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vinyl not found");
}

#[tokio::test]
async fn test_delete_vinyl() {
    let app = test_app();
    let cookie = app.session_cookie(true).await;

    let (_, created) = app
        .send(json_request(
            "POST",
            "/vinyls",
            Some(&cookie),
            &vinyl_body("Blue", "Joni Mitchell"),
        ))
        .await;
    let id = created["vinyl"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(bare_request(
            "DELETE",
            &format!("/vinyls/{}", id),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.vinyls.list().await.unwrap().is_empty());

    let (status, body) = app
        .send(bare_request(
            "DELETE",
            &format!("/vinyls/{}", Uuid::new_v4()),
            Some(&cookie),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Vinyl not found");
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let app = test_app();
    let cookie = app.session_cookie(false).await;

    let (status, _) = app
        .send(bare_request(
            "DELETE",
            &format!("/vinyls/{}", Uuid::new_v4()),
            Some(&cookie),
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signup_login_session_logout_flow() {
    let app = test_app();

    let (status, _) = app
        .send(json_request(
            "POST",
            "/users",
            None,
            &json!({
                "firstName": "A",
                "lastName": "B",
                "email": "a@b.com",
                "userName": "ab",
                "plainPass": "longenough1"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Log in and capture the session cookie.
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/session",
            None,
            &json!({"email": "a@b.com", "plainPass": "longenough1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets the session cookie")
        .to_str()
        .unwrap();
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    assert!(cookie.starts_with("disclist_session="));

    // The session resolves back to the same user.
    let (status, body) = app
        .send(bare_request("GET", "/session", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "a@b.com");
    assert_eq!(body["isAdmin"], false);
    assert!(body.get("passwordHash").is_none());

    // Logout is idempotent and kills the session.
    let (status, _) = app
        .send(bare_request("DELETE", "/session", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send(bare_request("GET", "/session", Some(&cookie)))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.send(bare_request("DELETE", "/session", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_uniformly() {
    let app = test_app();

    app.send(json_request(
        "POST",
        "/users",
        None,
        &json!({
            "firstName": "A",
            "lastName": "B",
            "email": "a@b.com",
            "userName": "ab",
            "plainPass": "longenough1"
        }),
    ))
    .await;

    // Wrong password and unknown email are indistinguishable.
    let (status, _) = app
        .send(json_request(
            "POST",
            "/session",
            None,
            &json!({"email": "a@b.com", "plainPass": "wrongpassword"}),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(json_request(
            "POST",
            "/session",
            None,
            &json!({"email": "nobody@b.com", "plainPass": "longenough1"}),
        ))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_validation_reports_every_field() {
    let app = test_app();

    let (status, body) = app
        .send(json_request("POST", "/users", None, &json!({})))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    for field in ["firstName", "lastName", "email", "userName", "plainPass"] {
        assert!(body.get(field).is_some(), "missing key {}", field);
    }
}

#[tokio::test]
async fn test_session_check_without_cookie_is_401() {
    let app = test_app();
    let (status, _) = app.send(bare_request("GET", "/session", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn multipart_request(uri: &str, cookie: &str, body: String, boundary: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_upload_image_returns_public_url() {
    let app = test_app();
    let cookie = app.session_cookie(true).await;

    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"image\"; filename=\"cover.png\"\r\n\
         Content-Type: image/png\r\n\r\n\
         fake png bytes\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let (status, body) = app
        .send(multipart_request("/upload-image", &cookie, body, boundary))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let url = body["imageUrl"].as_str().unwrap();
    assert!(url.starts_with("https://test-bucket.s3.us-west-2.amazonaws.com/vinyl-covers/"));
    assert!(url.ends_with("-cover.png"));

    let puts = app.images.puts.lock().unwrap();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].1, "image/png");
    assert_eq!(puts[0].2, "fake png bytes".len());
}

#[tokio::test]
async fn test_upload_without_file_is_400() {
    let app = test_app();
    let cookie = app.session_cookie(true).await;

    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"note\"\r\n\r\n\
         not a file\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let (status, body) = app
        .send(multipart_request("/upload-image", &cookie, body, boundary))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn test_upload_text_field_named_image_is_400() {
    let app = test_app();
    let cookie = app.session_cookie(true).await;

    // A plain text field named `image` is not a file upload.
    let boundary = "test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"image\"\r\n\r\n\
         just some text\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let (status, body) = app
        .send(multipart_request("/upload-image", &cookie, body, boundary))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file uploaded");
    assert!(app.images.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_gate_with_dangling_session_is_401() {
    let app = test_app();

    // A live token whose user record no longer exists resolves like no
    // session at all.
    let token = generate_token();
    app.state.sessions.set(&token, Uuid::new_v4()).await.unwrap();
    let cookie = format!("disclist_session={}", token);

    let (status, body) = app
        .send(json_request(
            "POST",
            "/vinyls",
            Some(&cookie),
            &vinyl_body("A", "B"),
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");
}

#[tokio::test]
async fn test_upload_requires_admin() {
    let app = test_app();

    let boundary = "test-boundary";
    let body = format!("--{b}--\r\n", b = boundary);
    let request = Request::builder()
        .method("POST")
        .uri("/upload-image")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.images.puts.lock().unwrap().is_empty());
}
