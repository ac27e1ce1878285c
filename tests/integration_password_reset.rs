mod common;

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{
    body_json, create_test_user, json_request, session_cookie, setup_test_app,
    setup_test_app_with_mailer, unused_pool,
};
use schoolhub::utils::email::{MailError, MockMailer};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

fn with_cookie(method: &str, uri: &str, cookie: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Mailer that expects one OTP mail and keeps its body.
fn capturing_mailer() -> (MockMailer, Arc<Mutex<String>>) {
    let captured = Arc::new(Mutex::new(String::new()));
    let sink = captured.clone();

    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .withf(|subject, _, _, to| {
            subject.to_string() == "Password Reset OTP" && to[0] == "jonathan@school.edu"
        })
        .times(1)
        .returning(move |_, body, _, _| {
            *sink.lock().unwrap() = body.to_string();
            Ok(())
        });

    (mailer, captured)
}

fn otp_from(body: &str) -> String {
    body.chars().filter(char::is_ascii_digit).collect()
}

#[tokio::test]
async fn test_reset_without_verification_redirects() {
    let app = setup_test_app(unused_pool());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/reset-password",
            json!({ "new_password": "newpass123", "confirm_password": "newpass123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/forgot-password/"
    );
    assert!(session_cookie(&response).starts_with("schoolhub_session="));
}

#[tokio::test]
async fn test_verify_without_pending_otp_is_invalid() {
    let app = setup_test_app(unused_pool());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/verify-otp",
            json!({ "otp": "123456" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid OTP");
}

#[tokio::test]
async fn test_verify_rejects_non_numeric_code() {
    let app = setup_test_app(unused_pool());

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/verify-otp",
            json!({ "otp": "12ab56" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid OTP format");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_reset_flow(pool: PgPool) {
    create_test_user(
        &pool,
        "jonathan",
        "oldpass123",
        "STUDENT",
        Some("jonathan@school.edu"),
    )
    .await;
    let (mailer, captured) = capturing_mailer();
    let app = setup_test_app_with_mailer(pool.clone(), Arc::new(mailer));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/forgot-password",
            json!({ "username": "jonathan" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let body = body_json(response).await;
    assert_eq!(body["masked_email"], "jo****@school.edu");

    let otp = otp_from(&captured.lock().unwrap());
    assert_eq!(otp.len(), 6);

    let response = app
        .clone()
        .oneshot(with_cookie(
            "POST",
            "/api/auth/verify-otp",
            &cookie,
            json!({ "otp": "000000" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(with_cookie(
            "POST",
            "/api/auth/verify-otp",
            &cookie,
            json!({ "otp": otp }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(with_cookie(
            "POST",
            "/api/auth/reset-password",
            &cookie,
            json!({ "new_password": "newpass123", "confirm_password": "different" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(with_cookie(
            "POST",
            "/api/auth/reset-password",
            &cookie,
            json!({ "new_password": "newpass123", "confirm_password": "newpass123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Session is cleared: replaying the final step starts over.
    let response = app
        .clone()
        .oneshot(with_cookie(
            "POST",
            "/api/auth/reset-password",
            &cookie,
            json!({ "new_password": "again123", "confirm_password": "again123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            json!({ "username": "jonathan", "password": "newpass123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_user_sends_no_mail(pool: PgPool) {
    let mut mailer = MockMailer::new();
    mailer.expect_send().never();
    let app = setup_test_app_with_mailer(pool.clone(), Arc::new(mailer));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/forgot-password",
            json!({ "username": "ghost" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_without_email_is_told_to_contact_admin(pool: PgPool) {
    create_test_user(&pool, "noemail", "oldpass123", "STAFF", None).await;
    let mut mailer = MockMailer::new();
    mailer.expect_send().never();
    let app = setup_test_app_with_mailer(pool.clone(), Arc::new(mailer));

    let response = app
        .oneshot(json_request(
            "POST",
            "/api/auth/forgot-password",
            json!({ "username": "noemail" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("contact administrator"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_otp_mail_failure_does_not_advance_session(pool: PgPool) {
    create_test_user(
        &pool,
        "jonathan",
        "oldpass123",
        "STUDENT",
        Some("jonathan@school.edu"),
    )
    .await;
    let mut mailer = MockMailer::new();
    mailer
        .expect_send()
        .times(1)
        .returning(|_, _, _, _| Err(MailError::Transport("connection refused".into())));
    let app = setup_test_app_with_mailer(pool.clone(), Arc::new(mailer));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/forgot-password",
            json!({ "username": "jonathan" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let cookie = session_cookie(&response);

    let response = app
        .oneshot(with_cookie(
            "POST",
            "/api/auth/reset-password",
            &cookie,
            json!({ "new_password": "newpass123", "confirm_password": "newpass123" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_completions_succeed_once(pool: PgPool) {
    create_test_user(
        &pool,
        "jonathan",
        "oldpass123",
        "STUDENT",
        Some("jonathan@school.edu"),
    )
    .await;
    let (mailer, captured) = capturing_mailer();
    let app = setup_test_app_with_mailer(pool.clone(), Arc::new(mailer));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/forgot-password",
            json!({ "username": "jonathan" }),
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    let otp = otp_from(&captured.lock().unwrap());

    let response = app
        .clone()
        .oneshot(with_cookie(
            "POST",
            "/api/auth/verify-otp",
            &cookie,
            json!({ "otp": otp }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let first = app.clone().oneshot(with_cookie(
        "POST",
        "/api/auth/reset-password",
        &cookie,
        json!({ "new_password": "firstpass1", "confirm_password": "firstpass1" }),
    ));
    let second = app.clone().oneshot(with_cookie(
        "POST",
        "/api/auth/reset-password",
        &cookie,
        json!({ "new_password": "secondpass2", "confirm_password": "secondpass2" }),
    ));
    let (first, second) = tokio::join!(first, second);
    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort_by_key(|status| status.as_u16());

    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::SEE_OTHER]);
}
