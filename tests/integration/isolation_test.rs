//! Cross-tenant isolation at the HTTP boundary.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

async fn two_tenants() -> TestApp {
    let app = TestApp::new().await;
    app.create_tenant("acme").await;
    app.create_tenant("globex").await;
    app.create_admin("acme", "admin@acme.io", false).await;
    app.create_admin("globex", "admin@globex.io", false).await;
    app.register("acme", "ana@acme.io").await;
    app.register("globex", "gus@globex.io").await;
    app
}

#[tokio::test]
async fn test_listings_never_cross_tenants() {
    let app = two_tenants().await;
    let admin = app.login("acme", "admin@acme.io").await;

    let users = app
        .request("GET", "/api/t/acme/users", None, Some(&admin.access_token))
        .await;
    assert_eq!(users.status, StatusCode::OK);
    let emails: Vec<&str> = users
        .data()
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|u| u["email"].as_str())
        .collect();
    assert!(emails.contains(&"ana@acme.io"));
    assert!(!emails.contains(&"gus@globex.io"));
}

#[tokio::test]
async fn test_credential_from_another_tenant_is_rejected() {
    let app = two_tenants().await;
    let admin = app.login("acme", "admin@acme.io").await;

    let response = app
        .request("GET", "/api/t/globex/users", None, Some(&admin.access_token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "TENANT_MISMATCH");
}

#[tokio::test]
async fn test_system_admin_may_cross_tenants() {
    let app = two_tenants().await;
    app.create_tenant("ops").await;
    app.create_admin("ops", "root@formhub.io", true).await;
    let root = app.login("ops", "root@formhub.io").await;

    let response = app
        .request("GET", "/api/t/globex/users", None, Some(&root.access_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let emails: Vec<&str> = response
        .data()
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|u| u["email"].as_str())
        .collect();
    assert!(emails.contains(&"gus@globex.io"));
    assert!(!emails.contains(&"ana@acme.io"));
}

#[tokio::test]
async fn test_user_of_other_tenant_is_not_found() {
    let app = two_tenants().await;
    let acme_admin = app.login("acme", "admin@acme.io").await;
    let gus = app.login("globex", "gus@globex.io").await;

    let response = app
        .request(
            "POST",
            &format!("/api/t/acme/users/{}/revoke-sessions", gus.user_id),
            None,
            Some(&acme_admin.access_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_keys_are_unique_per_tenant() {
    let app = two_tenants().await;
    let acme = app.login("acme", "admin@acme.io").await;
    let globex = app.login("globex", "admin@globex.io").await;
    let body = json!({ "key": "ops", "name": "Operations" });

    let first = app
        .request("POST", "/api/t/acme/groups", Some(body.clone()), Some(&acme.access_token))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let other_tenant = app
        .request("POST", "/api/t/globex/groups", Some(body.clone()), Some(&globex.access_token))
        .await;
    assert_eq!(other_tenant.status, StatusCode::CREATED);

    let duplicate = app
        .request("POST", "/api/t/acme/groups", Some(body), Some(&acme.access_token))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let same_email = app.register("globex", "ana@acme.io").await;
    assert_eq!(same_email.status, StatusCode::CREATED);
}
