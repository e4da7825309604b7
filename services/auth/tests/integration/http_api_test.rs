use std::sync::Arc;

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use serde_json::json;

use hut_auth::domain::repository::UserDirectory;
use hut_auth::domain::types::AdminCredentials;
use hut_auth::router::build_router;
use hut_core::ratelimit::SlidingWindowLimiter;

use crate::helpers::{TEST_ADMIN_EMAIL, TestBackends, seed_user};

fn server(backends: &TestBackends) -> TestServer {
    TestServer::new(build_router(backends.state())).unwrap()
}

/// Seed stored admin credentials directly, skipping the reset flow.
async fn seed_admin(backends: &TestBackends, username: &str, password: &str) -> AdminCredentials {
    let credentials = AdminCredentials {
        id: uuid::Uuid::new_v4(),
        email: TEST_ADMIN_EMAIL.to_owned(),
        username: username.to_owned(),
        password_hash: backends.hasher.hash(password).unwrap(),
    };
    backends
        .directory
        .upsert_admin_credentials(&credentials)
        .await
        .unwrap();
    credentials
}

#[tokio::test]
async fn healthz_and_readyz_respond() {
    let backends = TestBackends::new();
    let server = server(&backends);

    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/readyz").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn admin_send_otp_responses_are_byte_identical() {
    let backends = TestBackends::new();
    let server = server(&backends);

    let for_admin = server
        .post("/auth/admin/send-otp")
        .json(&json!({ "email": TEST_ADMIN_EMAIL }))
        .await;
    let for_stranger = server
        .post("/auth/admin/send-otp")
        .json(&json!({ "email": "stranger@x.com" }))
        .await;

    assert_eq!(for_admin.status_code(), StatusCode::OK);
    assert_eq!(for_stranger.status_code(), for_admin.status_code());
    assert_eq!(for_stranger.text(), for_admin.text());
}

#[tokio::test]
async fn admin_reset_send_otp_responses_are_byte_identical() {
    let backends = TestBackends::new();
    let server = server(&backends);

    let for_admin = server
        .post("/auth/admin/reset/send-otp")
        .json(&json!({ "email": TEST_ADMIN_EMAIL }))
        .await;
    let for_stranger = server
        .post("/auth/admin/reset/send-otp")
        .json(&json!({ "email": "stranger@x.com" }))
        .await;

    assert_eq!(for_admin.status_code(), StatusCode::OK);
    assert_eq!(for_stranger.status_code(), for_admin.status_code());
    assert_eq!(for_stranger.text(), for_admin.text());
}

#[tokio::test]
async fn password_reset_send_responses_are_byte_identical() {
    let backends = TestBackends::new();
    seed_user(&backends.directory, "known@x.com", "alice");
    let server = server(&backends);

    let for_known = server
        .post("/auth/password/send-reset-otp")
        .json(&json!({ "email": "known@x.com" }))
        .await;
    let for_unknown = server
        .post("/auth/password/send-reset-otp")
        .json(&json!({ "email": "unknown@x.com" }))
        .await;

    assert_eq!(for_known.status_code(), StatusCode::OK);
    assert_eq!(for_unknown.status_code(), for_known.status_code());
    assert_eq!(for_unknown.text(), for_known.text());
}

#[tokio::test]
async fn signup_flow_over_http_creates_account() {
    let backends = TestBackends::new();
    let server = server(&backends);

    let sent = server
        .post("/auth/signup/send-otp")
        .json(&json!({
            "email": "a@x.com",
            "name": "New User",
            "username": "newuser",
            "password": "long-enough-password",
        }))
        .await;
    assert_eq!(sent.status_code(), StatusCode::OK);

    let code = backends.mailer.last_code_for("a@x.com").unwrap();
    let verified = server
        .post("/auth/signup/verify")
        .json(&json!({ "email": "a@x.com", "otp": code }))
        .await;
    assert_eq!(verified.status_code(), StatusCode::CREATED);

    let body: serde_json::Value = verified.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "newuser");
    assert!(
        backends
            .directory
            .find_by_email("a@x.com")
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn invalid_email_yields_400_with_error_body() {
    let backends = TestBackends::new();
    let server = server(&backends);

    let response = server
        .post("/auth/password/send-reset-otp")
        .json(&json!({ "email": "not-an-email" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid email format");
}

#[tokio::test]
async fn fourth_otp_send_in_window_is_429() {
    let backends = TestBackends::new();
    let server = server(&backends);
    let payload = json!({
        "email": "a@x.com",
        "name": "New User",
        "username": "newuser",
        "password": "long-enough-password",
    });

    for _ in 0..3 {
        let response = server.post("/auth/signup/send-otp").json(&payload).await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }
    let fourth = server.post("/auth/signup/send-otp").json(&payload).await;
    assert_eq!(fourth.status_code(), StatusCode::TOO_MANY_REQUESTS);
    let body: serde_json::Value = fourth.json();
    assert_eq!(body["error"], "Too many requests. Please try again later.");
}

#[tokio::test]
async fn wrong_code_is_401_with_generic_body() {
    let backends = TestBackends::new();
    let server = server(&backends);

    server
        .post("/auth/signup/send-otp")
        .json(&json!({
            "email": "a@x.com",
            "name": "New User",
            "username": "newuser",
            "password": "long-enough-password",
        }))
        .await;
    let code = backends.mailer.last_code_for("a@x.com").unwrap();
    let wrong = if code == "123456" { "654321" } else { "123456" };

    let response = server
        .post("/auth/signup/verify")
        .json(&json!({ "email": "a@x.com", "otp": wrong }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Invalid or expired verification code");
}

#[tokio::test]
async fn admin_login_sets_session_cookie_and_session_endpoint_accepts_it() {
    let backends = TestBackends::new();
    let admin = seed_admin(&backends, "chief", "a-strong-password").await;
    let server = server(&backends);

    server
        .post("/auth/admin/send-otp")
        .json(&json!({ "email": TEST_ADMIN_EMAIL }))
        .await;
    let code = backends.mailer.last_code_for(TEST_ADMIN_EMAIL).unwrap();

    let login = server
        .post("/auth/admin/verify")
        .json(&json!({
            "email": TEST_ADMIN_EMAIL,
            "otp": code,
            "username": "chief",
            "password": "a-strong-password",
        }))
        .await;
    assert_eq!(login.status_code(), StatusCode::OK);
    let body: serde_json::Value = login.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["admin"]["isAdmin"], true);
    assert_eq!(body["admin"]["id"], admin.id.to_string());

    let headers = login.headers();
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .expect("session cookie must be set")
        .to_str()
        .unwrap()
        .to_owned();
    assert!(set_cookie.starts_with("hut_admin_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=7200"));
    assert!(set_cookie.contains("Path=/"));

    // The cookie authorizes the session check.
    let cookie_pair = set_cookie.split(';').next().unwrap().to_owned();
    let session = server
        .get("/auth/admin/session")
        .add_header(
            header::COOKIE,
            axum::http::HeaderValue::from_str(&cookie_pair).unwrap(),
        )
        .await;
    assert_eq!(session.status_code(), StatusCode::OK);
    let session_body: serde_json::Value = session.json();
    assert_eq!(session_body["admin"]["name"], "chief");

    // Without it, a uniform 401.
    let anonymous = server.get("/auth/admin/session").await;
    assert_eq!(anonymous.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let backends = TestBackends::new();
    let server = server(&backends);

    let response = server.delete("/auth/admin/session").await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let headers = response.headers();
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .expect("clearing cookie must be set")
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("hut_admin_session="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn bad_admin_credentials_are_indistinguishable_from_bad_code() {
    let backends = TestBackends::new();
    seed_admin(&backends, "chief", "a-strong-password").await;
    let server = server(&backends);

    server
        .post("/auth/admin/send-otp")
        .json(&json!({ "email": TEST_ADMIN_EMAIL }))
        .await;
    let code = backends.mailer.last_code_for(TEST_ADMIN_EMAIL).unwrap();

    let bad_password = server
        .post("/auth/admin/verify")
        .json(&json!({
            "email": TEST_ADMIN_EMAIL,
            "otp": code,
            "username": "chief",
            "password": "wrong-password",
        }))
        .await;

    server
        .post("/auth/admin/send-otp")
        .json(&json!({ "email": TEST_ADMIN_EMAIL }))
        .await;
    let fresh_code = backends.mailer.last_code_for(TEST_ADMIN_EMAIL).unwrap();
    let wrong = if fresh_code == "123456" {
        "654321"
    } else {
        "123456"
    };
    let bad_code = server
        .post("/auth/admin/verify")
        .json(&json!({
            "email": TEST_ADMIN_EMAIL,
            "otp": wrong,
            "username": "chief",
            "password": "a-strong-password",
        }))
        .await;

    assert_eq!(bad_password.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(bad_code.status_code(), bad_password.status_code());
    assert_eq!(bad_code.text(), bad_password.text());
}

#[tokio::test]
async fn ip_limiter_rejects_when_exhausted() {
    let backends = TestBackends::new();
    let mut state = backends.state();
    state.ip_limiter = Arc::new(SlidingWindowLimiter::new(2, 900));
    let server = TestServer::new(build_router(state)).unwrap();

    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    assert_eq!(server.get("/healthz").await.status_code(), StatusCode::OK);
    let third = server.get("/healthz").await;
    assert_eq!(third.status_code(), StatusCode::TOO_MANY_REQUESTS);
}
