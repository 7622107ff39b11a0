//! Authentication contract: register, login, refresh, logout, me.

use http::StatusCode;
use serde_json::json;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_register_and_login_through_tenant_path() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;

    let registered = app.register("acme", "Ana@Acme.io").await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.data()["email"], "ana@acme.io");
    assert!(registered.data().get("password_hash").is_none());
    assert!(registered.data().get("token_version").is_none());

    let session = app.login("acme", "ana@acme.io").await;
    let me = app
        .request("GET", "/api/t/acme/auth/me", None, Some(&session.access_token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["id"], session.user_id.as_str());
    assert_eq!(me.data()["view_version"], 1);
}

#[tokio::test]
async fn test_weak_password_is_rejected() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    let response = app
        .request(
            "POST",
            "/api/t/acme/auth/register",
            Some(json!({ "email": "ana@acme.io", "password": "password" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION");
}

#[tokio::test]
async fn test_wrong_tenant_is_distinguishable_from_wrong_password() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    app.create_tenant("globex").await;
    app.register("acme", "ana@acme.io").await;

    let wrong_tenant = app
        .request(
            "POST",
            "/api/t/globex/auth/login",
            Some(json!({ "email": "ana@acme.io", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(wrong_tenant.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_tenant.error_code(), "TENANT_MISMATCH");

    let wrong_password = app
        .request(
            "POST",
            "/api/t/acme/auth/login",
            Some(json!({ "email": "ana@acme.io", "password": "lagoon-violet-tractor-94" })),
            None,
        )
        .await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_login_with_body_tenant_key_or_none() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    app.register("acme", "ana@acme.io").await;

    let with_key = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ana@acme.io", "password": PASSWORD, "tenant_key": "acme" })),
            None,
        )
        .await;
    assert_eq!(with_key.status, StatusCode::OK);

    let without_key = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ana@acme.io", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(without_key.status, StatusCode::OK);
    assert!(without_key.data()["access_token"].is_string());
}

#[tokio::test]
async fn test_tenant_header_and_path_precedence() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;

    let via_header = app
        .request_with_headers(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "ana@acme.io", "password": PASSWORD })),
            None,
            &[("x-tenant-key", "acme")],
        )
        .await;
    assert_eq!(via_header.status, StatusCode::CREATED);

    let session = app.login("acme", "ana@acme.io").await;
    let path_wins = app
        .request_with_headers(
            "GET",
            "/api/t/acme/auth/me",
            None,
            Some(&session.access_token),
            &[("x-tenant-key", "no-such-tenant")],
        )
        .await;
    assert_eq!(path_wins.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_body_key_overrides_tenant_header() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    app.register("acme", "ana@acme.io").await;

    let body_wins = app
        .request_with_headers(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ana@acme.io", "password": PASSWORD, "tenant_key": "acme" })),
            None,
            &[("x-tenant-key", "no-such-tenant")],
        )
        .await;
    assert_eq!(body_wins.status, StatusCode::OK, "{:?}", body_wins.body);

    let header_only = app
        .request_with_headers(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ana@acme.io", "password": PASSWORD })),
            None,
            &[("x-tenant-key", "no-such-tenant")],
        )
        .await;
    assert_eq!(header_only.status, StatusCode::NOT_FOUND);
    assert_eq!(header_only.error_code(), "TENANT_NOT_FOUND");
}

#[tokio::test]
async fn test_tenant_resolution_errors() {
    let app = TestApp::new().await;
    let body = json!({ "email": "ana@acme.io", "password": PASSWORD });

    let missing = app
        .request("POST", "/api/auth/register", Some(body.clone()), None)
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.error_code(), "MISSING_TENANT");

    let unknown = app
        .request("POST", "/api/t/nowhere/auth/register", Some(body), None)
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown.error_code(), "TENANT_NOT_FOUND");
}

#[tokio::test]
async fn test_soft_refresh_and_rotation() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    app.register("acme", "ana@acme.io").await;
    let session = app.login("acme", "ana@acme.io").await;

    let soft = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": session.refresh_token })),
            None,
        )
        .await;
    assert_eq!(soft.status, StatusCode::OK);
    assert!(soft.data()["access_token"].is_string());
    assert!(soft.data().get("refresh_token").is_none());

    let rotated = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": session.refresh_token, "rotate": true })),
            None,
        )
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    let next = rotated.data()["refresh_token"]
        .as_str()
        .expect("rotated token")
        .to_string();

    let replay = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": session.refresh_token })),
            None,
        )
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);
    assert_eq!(replay.error_code(), "INVALID_REFRESH_TOKEN");

    let again = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": next })),
            None,
        )
        .await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_revokes_refresh_tokens() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    app.register("acme", "ana@acme.io").await;
    let session = app.login("acme", "ana@acme.io").await;

    let logout = app
        .request("POST", "/api/t/acme/auth/logout", None, Some(&session.access_token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let refresh = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": session.refresh_token })),
            None,
        )
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
    assert_eq!(refresh.error_code(), "INVALID_REFRESH_TOKEN");
}

#[tokio::test]
async fn test_me_requires_a_credential() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;

    let anonymous = app.request("GET", "/api/t/acme/auth/me", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["success"], false);

    let garbage = app
        .request("GET", "/api/t/acme/auth/me", None, Some("not-a-jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_access_token_is_rejected() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    app.register("acme", "ana@acme.io").await;
    let session = app.login("acme", "ana@acme.io").await;

    app.clock.advance(chrono::Duration::minutes(16));
    let me = app
        .request("GET", "/api/t/acme/auth/me", None, Some(&session.access_token))
        .await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}
