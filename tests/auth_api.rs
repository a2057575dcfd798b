//! Authentication flows against real Postgres and Redis

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, signup_body};

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_signup_sets_cookie_and_profile_reads_it() {
    let app = TestApp::spawn().await;
    let email = format!("cookie-{}@fleetops.test", Uuid::new_v4().simple());

    let signup = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(signup_body(&email, "secret-pass")),
        )
        .await;
    assert_eq!(signup.status, StatusCode::CREATED);
    assert_eq!(signup.body["user"]["email"], email);
    assert_eq!(signup.body["user"]["role"], "user");
    assert!(signup.body["user"].get("password_hash").is_none());

    let cookie = signup.headers[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));
    let pair = cookie.split(';').next().unwrap().to_string();

    let profile = app
        .send(
            Request::builder()
                .uri("/api/v1/auth/profile")
                .header(header::COOKIE, pair)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(profile.status, StatusCode::OK);
    assert_eq!(profile.body["email"], email);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_duplicate_signup_conflicts() {
    let app = TestApp::spawn().await;
    let email = format!("dup-{}@fleetops.test", Uuid::new_v4().simple());

    let first = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(signup_body(&email, "secret-pass")),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let second = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(signup_body(&email.to_uppercase(), "secret-pass")),
        )
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_wrong_password_and_missing_token_are_unauthorized() {
    let app = TestApp::spawn().await;
    let session = app.session("user").await;

    let login = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": session.email, "password": "not-the-password" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::UNAUTHORIZED);

    let profile = app
        .request(Method::GET, "/api/v1/auth/profile", None, None)
        .await;
    assert_eq!(profile.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_deactivated_user_is_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.session("admin").await;
    let driver = app.session("user").await;

    let toggled = app
        .post(
            &format!("/api/v1/users/{}/toggle-active", driver.id),
            &admin.token,
            json!({ "active": false }),
        )
        .await;
    assert_eq!(toggled.status, StatusCode::OK, "{}", toggled.body);

    let profile = app.get("/api/v1/auth/profile", &driver.token).await;
    assert_eq!(profile.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_drivers_cannot_manage_users() {
    let app = TestApp::spawn().await;
    let driver = app.session("user").await;

    let users = app.get("/api/v1/users", &driver.token).await;
    assert_eq!(users.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_health() {
    let app = TestApp::spawn().await;

    let health = app.request(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "healthy");

    let ready = app
        .request(Method::GET, "/api/v1/health/ready", None, None)
        .await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.body["database"], "ok");
}

#[tokio::test]
#[ignore = "requires a docker daemon"]
async fn test_refresh_rotates_and_rejects_wildcards() {
    let app = TestApp::spawn().await;
    // Another live session that a wildcard must never reach
    app.session("admin").await;

    let email = format!("refresh-{}@fleetops.test", Uuid::new_v4().simple());
    let signup = app
        .request(
            Method::POST,
            "/api/v1/auth/signup",
            None,
            Some(signup_body(&email, "secret-pass")),
        )
        .await;
    assert_eq!(signup.status, StatusCode::CREATED);

    let login = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            Some(json!({ "email": email, "password": "secret-pass" })),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let refresh = login.body["refresh_token"].as_str().unwrap().to_string();

    for token in ["*", "*:*"] {
        let stolen = app
            .request(
                Method::POST,
                "/api/v1/auth/refresh",
                None,
                Some(json!({ "refresh_token": token })),
            )
            .await;
        assert_eq!(stolen.status, StatusCode::UNAUTHORIZED);
    }

    let rotated = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    assert_ne!(rotated.body["refresh_token"], refresh.as_str());

    let replay = app
        .request(
            Method::POST,
            "/api/v1/auth/refresh",
            None,
            Some(json!({ "refresh_token": refresh })),
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
}
