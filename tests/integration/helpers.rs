//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use formhub_api::{AppState, build_app, build_state};
use formhub_core::config::AppConfig;
use formhub_core::traits::ManualClock;
use formhub_database::MemoryDocumentStore;
use formhub_entity::tenant::CreateTenant;
use formhub_service::tenant::BootstrapAdmin;

/// A password that satisfies the strength policy.
pub const PASSWORD: &str = "violet-tractor-93-lagoon";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Wired state for direct setup
    pub state: AppState,
    /// Clock shared by the resolver cache and the token service
    pub clock: ManualClock,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` if not JSON)
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The machine-readable error code of an error envelope.
    pub fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }
}

/// Tokens from a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
}

impl TestApp {
    /// Create a new test application on the in-memory store
    pub async fn new() -> Self {
        Self::with_config(AppConfig::default()).await
    }

    /// Create a test application with a custom configuration
    pub async fn with_config(config: AppConfig) -> Self {
        let clock = ManualClock::starting_now();
        let state = build_state(
            config,
            Arc::new(MemoryDocumentStore::new()),
            Arc::new(clock.clone()),
        );
        Self {
            router: build_app(state.clone()),
            state,
            clock,
        }
    }

    /// Create a tenant directly through the service
    pub async fn create_tenant(&self, key: &str) {
        self.state
            .tenant_service
            .create(CreateTenant {
                key: key.into(),
                display_name: format!("{key} Inc."),
            })
            .await
            .expect("create tenant");
    }

    /// Create an administrator directly through the service
    pub async fn create_admin(&self, tenant_key: &str, email: &str, system: bool) {
        self.state
            .tenant_service
            .create_admin(BootstrapAdmin {
                tenant_key: tenant_key.into(),
                email: email.into(),
                password: PASSWORD.into(),
                display_name: None,
                system,
            })
            .await
            .expect("create admin");
    }

    /// Register a member through the API
    pub async fn register(&self, tenant_key: &str, email: &str) -> TestResponse {
        self.request(
            "POST",
            &format!("/api/t/{tenant_key}/auth/register"),
            Some(json!({ "email": email, "password": PASSWORD })),
            None,
        )
        .await
    }

    /// Log in through the tenant path and return the issued tokens
    pub async fn login(&self, tenant_key: &str, email: &str) -> Session {
        let response = self
            .request(
                "POST",
                &format!("/api/t/{tenant_key}/auth/login"),
                Some(json!({ "email": email, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {:?}", response.body);
        let data = response.data();
        Session {
            access_token: data["access_token"].as_str().expect("access").to_string(),
            refresh_token: data["refresh_token"].as_str().expect("refresh").to_string(),
            user_id: data["principal"]["id"].as_str().expect("id").to_string(),
        }
    }

    /// Send a JSON request
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, token, &[]).await
    }

    /// Send a JSON request with extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}
