#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use schoolhub::router::init_router;
use schoolhub::state::AppState;
use schoolhub::utils::email::{LogMailer, Mailer};
use schoolhub_auth::create_access_token;
use schoolhub_cache::MemorySessionStore;
use schoolhub_config::{CorsConfig, EmailConfig, JwtConfig, SessionConfig};
use schoolhub_core::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role: String,
}

pub fn test_state(db: PgPool, mailer: Arc<dyn Mailer>) -> AppState {
    AppState {
        db,
        jwt_config: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry: 3600,
        },
        email_config: EmailConfig::default(),
        cors_config: CorsConfig::parse("http://localhost:5173"),
        session_config: SessionConfig::default(),
        sessions: Arc::new(MemorySessionStore::new()),
        mailer,
    }
}

pub fn setup_test_app(db: PgPool) -> Router {
    init_router(test_state(db, Arc::new(LogMailer)))
}

pub fn setup_test_app_with_mailer(db: PgPool, mailer: Arc<dyn Mailer>) -> Router {
    init_router(test_state(db, mailer))
}

/// A pool that never connects; for requests rejected before any query runs.
pub fn unused_pool() -> PgPool {
    PgPool::connect_lazy("postgres://localhost:1/unused").unwrap()
}

pub fn token_for(user_id: Uuid, username: &str, role: &str) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry: 3600,
    };
    create_access_token(user_id, username, role, &config).unwrap()
}

pub fn admin_token() -> String {
    token_for(Uuid::new_v4(), "admin", "ADMIN")
}

pub async fn create_test_user(
    db: &PgPool,
    username: &str,
    password: &str,
    role: &str,
    email: Option<&str>,
) -> TestUser {
    let hashed = hash_password(password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, email, password, first_name, last_name, role)
         VALUES ($1, $2, $3, 'Test', 'User', $4)
         RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(hashed)
    .bind(role)
    .fetch_one(db)
    .await
    .unwrap();

    TestUser {
        id,
        username: username.to_string(),
        password: password.to_string(),
        role: role.to_string(),
    }
}

pub async fn attach_driver_profile(db: &PgPool, user_id: Uuid, license_number: &str) {
    sqlx::query(
        "INSERT INTO drivers (user_id, license_number, phone_number) VALUES ($1, $2, '0800000000')",
    )
    .bind(user_id)
    .bind(license_number)
    .execute(db)
    .await
    .unwrap();
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_json_request(
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` of the first `Set-Cookie` header, ready to send back.
pub fn session_cookie<B>(response: &Response<B>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
        .expect("response sets a session cookie")
}

pub fn generate_unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}
