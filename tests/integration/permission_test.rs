//! Group-scoped permissions and membership administration.

use http::StatusCode;
use serde_json::{Value, json};

use formhub_core::config::AppConfig;

use crate::helpers::{PASSWORD, TestApp};

/// A tenant with an admin and a group; returns the admin token and group id.
async fn tenant_with_group(app: &TestApp) -> (String, String) {
    app.create_tenant("acme").await;
    app.create_admin("acme", "admin@acme.io", false).await;
    let admin = app.login("acme", "admin@acme.io").await;
    let group = app
        .request(
            "POST",
            "/api/t/acme/groups",
            Some(json!({ "key": "ops", "name": "Operations" })),
            Some(&admin.access_token),
        )
        .await;
    assert_eq!(group.status, StatusCode::CREATED);
    let group_id = group.data()["id"].as_str().expect("id").to_string();
    (admin.access_token, group_id)
}

fn permissions(body: &Value) -> Vec<&str> {
    body["data"]["permissions"]
        .as_array()
        .expect("permissions")
        .iter()
        .filter_map(Value::as_str)
        .collect()
}

#[tokio::test]
async fn test_operator_membership_grants_formdata_edit_only() {
    let app = TestApp::new().await;
    let (admin, group_id) = tenant_with_group(&app).await;

    let invited = app
        .request(
            "POST",
            "/api/t/acme/users",
            Some(json!({
                "email": "op@acme.io",
                "password": PASSWORD,
                "memberships": [{ "group_id": group_id, "roles": ["Operator"] }],
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(invited.status, StatusCode::CREATED, "{:?}", invited.body);

    let operator = app.login("acme", "op@acme.io").await;
    let path = format!("/api/t/acme/groups/{group_id}/permissions");

    let own = app.request("GET", &path, None, Some(&operator.access_token)).await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(permissions(&own.body), vec!["FORMDATA_EDIT"]);
    assert_eq!(own.data()["authenticated"], true);

    let anonymous = app.request("GET", &path, None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert!(permissions(&anonymous.body).is_empty());
    assert_eq!(anonymous.data()["authenticated"], false);

    let admin_view = app.request("GET", &path, None, Some(&admin)).await;
    let granted = permissions(&admin_view.body);
    assert!(granted.contains(&"GROUP_MANAGE"));
    assert!(!granted.contains(&"TENANT_MANAGE"));
}

#[tokio::test]
async fn test_member_without_role_has_no_permissions() {
    let app = TestApp::new().await;
    let (_admin, group_id) = tenant_with_group(&app).await;
    app.register("acme", "ana@acme.io").await;
    let ana = app.login("acme", "ana@acme.io").await;

    let response = app
        .request(
            "GET",
            &format!("/api/t/acme/groups/{group_id}/permissions"),
            None,
            Some(&ana.access_token),
        )
        .await;
    assert!(permissions(&response.body).is_empty());

    let create = app
        .request(
            "POST",
            "/api/t/acme/groups",
            Some(json!({ "key": "hr", "name": "HR" })),
            Some(&ana.access_token),
        )
        .await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_membership_edits_are_compare_and_swap() {
    let app = TestApp::new().await;
    let (admin, group_id) = tenant_with_group(&app).await;
    let registered = app.register("acme", "ana@acme.io").await;
    let user_id = registered.data()["id"].as_str().expect("id").to_string();
    let path = format!("/api/t/acme/users/{user_id}/memberships");

    let listed = app.request("GET", "/api/t/acme/users", None, Some(&admin)).await;
    let revision = listed
        .data()
        .as_array()
        .expect("users")
        .iter()
        .find(|u| u["id"] == user_id.as_str())
        .and_then(|u| u["revision"].as_u64())
        .expect("revision");

    let first = app
        .request(
            "PUT",
            &path,
            Some(json!({
                "memberships": [{ "group_id": group_id, "roles": ["Viewer"] }],
                "expected_revision": revision,
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let stale = app
        .request(
            "PUT",
            &path,
            Some(json!({ "memberships": [], "expected_revision": revision })),
            Some(&admin),
        )
        .await;
    assert_eq!(stale.status, StatusCode::CONFLICT);

    let reserved = app
        .request(
            "PUT",
            &path,
            Some(json!({ "memberships": [{ "group_id": group_id, "roles": ["TenantAdmin"] }] })),
            Some(&admin),
        )
        .await;
    assert_eq!(reserved.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_default_group_and_status_changes() {
    let app = TestApp::new().await;
    let (admin, group_id) = tenant_with_group(&app).await;
    app.register("acme", "ana@acme.io").await;
    let ana = app.login("acme", "ana@acme.io").await;
    let base = format!("/api/t/acme/users/{}", ana.user_id);

    let not_member = app
        .request(
            "PUT",
            &format!("{base}/default-group"),
            Some(json!({ "group_id": group_id })),
            Some(&admin),
        )
        .await;
    assert_eq!(not_member.status, StatusCode::BAD_REQUEST);

    app.request(
        "PUT",
        &format!("{base}/memberships"),
        Some(json!({ "memberships": [{ "group_id": group_id, "roles": ["Viewer"] }] })),
        Some(&admin),
    )
    .await;
    let with_default = app
        .request(
            "PUT",
            &format!("{base}/default-group"),
            Some(json!({ "group_id": group_id })),
            Some(&admin),
        )
        .await;
    assert_eq!(with_default.status, StatusCode::OK);
    assert_eq!(with_default.data()["default_group_id"], group_id.as_str());

    let suspended = app
        .request(
            "PUT",
            &format!("{base}/status"),
            Some(json!({ "status": "suspended" })),
            Some(&admin),
        )
        .await;
    assert_eq!(suspended.status, StatusCode::OK);

    let me = app
        .request("GET", "/api/t/acme/auth/me", None, Some(&ana.access_token))
        .await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dev_bypass_skips_credentials_except_strict_routes() {
    let mut config = AppConfig::default();
    config.auth.dev_bypass = true;
    let app = TestApp::with_config(config).await;
    app.create_tenant("acme").await;

    let users = app.request("GET", "/api/t/acme/users", None, None).await;
    assert_eq!(users.status, StatusCode::OK);

    let me = app.request("GET", "/api/t/acme/auth/me", None, None).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}
