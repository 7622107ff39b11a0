//! Tenant lifecycle: admin routes, suspension, health.

use http::StatusCode;
use serde_json::json;

use formhub_entity::tenant::TenantStatus;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], true);
}

#[tokio::test]
async fn test_suspension_is_visible_after_cache_ttl() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    app.register("acme", "ana@acme.io").await;
    let session = app.login("acme", "ana@acme.io").await;

    app.state
        .tenant_service
        .set_status("acme", TenantStatus::Suspended)
        .await
        .expect("suspend");

    let cached = app
        .request("GET", "/api/t/acme/auth/me", None, Some(&session.access_token))
        .await;
    assert_eq!(cached.status, StatusCode::OK);

    app.clock.advance(chrono::Duration::seconds(61));
    let expired = app
        .request("GET", "/api/t/acme/auth/me", None, Some(&session.access_token))
        .await;
    assert_eq!(expired.status, StatusCode::FORBIDDEN);
    assert_eq!(expired.error_code(), "TENANT_SUSPENDED");

    let refresh = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": session.refresh_token })),
            None,
        )
        .await;
    assert_eq!(refresh.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_system_admin_manages_tenants() {
    let app = TestApp::new().await;
    app.create_tenant("ops").await;
    app.create_admin("ops", "root@formhub.io", true).await;
    let root = app.login("ops", "root@formhub.io").await;

    let created = app
        .request(
            "POST",
            "/api/admin/tenants",
            Some(json!({ "key": "Acme", "display_name": "Acme Inc." })),
            Some(&root.access_token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["key"], "acme");

    let duplicate = app
        .request(
            "POST",
            "/api/admin/tenants",
            Some(json!({ "key": "acme", "display_name": "Again" })),
            Some(&root.access_token),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let suspended = app
        .request(
            "PUT",
            "/api/admin/tenants/acme/status",
            Some(json!({ "status": "suspended" })),
            Some(&root.access_token),
        )
        .await;
    assert_eq!(suspended.status, StatusCode::OK);
    assert_eq!(suspended.data()["status"], "suspended");

    let listed = app
        .request("GET", "/api/admin/tenants", None, Some(&root.access_token))
        .await;
    assert_eq!(listed.data().as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_tenant_admin_cannot_manage_tenants() {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    app.create_admin("acme", "admin@acme.io", false).await;
    let admin = app.login("acme", "admin@acme.io").await;

    let response = app
        .request(
            "POST",
            "/api/admin/tenants",
            Some(json!({ "key": "globex", "display_name": "Globex" })),
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "FORBIDDEN");
}
