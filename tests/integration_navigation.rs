mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{
    attach_driver_profile, authed_request, body_json, create_test_user, setup_test_app,
    token_for, unused_pool,
};
use sqlx::PgPool;
use tower::ServiceExt;

#[tokio::test]
async fn test_dashboard_requires_token() {
    let app = setup_test_app(unused_pool());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/dashboard")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_rejects_invalid_token() {
    let app = setup_test_app(unused_pool());

    let response = app
        .oneshot(authed_request("GET", "/api/profile", "not-a-token"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_teacher_with_driver_profile_goes_to_driver_dashboard(pool: PgPool) {
    let user = create_test_user(&pool, "teacher_drv", "pass1234", "TEACHER", None).await;
    attach_driver_profile(&pool, user.id, "LIC-NAV-1").await;
    let token = token_for(user.id, &user.username, &user.role);

    let response = setup_test_app(pool.clone())
        .oneshot(authed_request("GET", "/api/dashboard", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/transport/driver-dashboard/"
    );
    let body = body_json(response).await;
    assert_eq!(body["location"], "/transport/driver-dashboard/");

    let response = setup_test_app(pool)
        .oneshot(authed_request("GET", "/api/profile", &token))
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/transport/driver-profile/"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_plain_teacher_goes_to_staff_dashboard(pool: PgPool) {
    let user = create_test_user(&pool, "teacher_plain", "pass1234", "TEACHER", None).await;
    let token = token_for(user.id, &user.username, &user.role);

    let response = setup_test_app(pool)
        .oneshot(authed_request("GET", "/api/dashboard", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/staff/dashboard/"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_stored_role_wins_over_token_role(pool: PgPool) {
    let user = create_test_user(&pool, "promoted", "pass1234", "ADMIN", None).await;
    let token = token_for(user.id, &user.username, "STUDENT");

    let response = setup_test_app(pool)
        .oneshot(authed_request("GET", "/api/dashboard", &token))
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin-dashboard/"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_parent_has_no_dashboard(pool: PgPool) {
    let user = create_test_user(&pool, "parent_abc123", "pass1234", "PARENT", None).await;
    let token = token_for(user.id, &user.username, &user.role);

    let response = setup_test_app(pool)
        .oneshot(authed_request("GET", "/api/dashboard", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Access denied for role 'PARENT'");
}
