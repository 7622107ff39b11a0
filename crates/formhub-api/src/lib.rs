//! # formhub-api
//!
//! HTTP API layer for FormHub built on Axum.
//!
//! Provides the authentication contract, tenant administration routes,
//! extractors for tenant resolution and session attachment, DTOs, and
//! error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use error::ApiError;
pub use state::AppState;
