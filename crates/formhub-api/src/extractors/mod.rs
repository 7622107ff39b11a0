//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod tenant;

pub use auth::{AuthUser, MaybeAuthUser, StrictAuthUser};
pub use json::ValidatedJson;
pub use tenant::{ActiveTenant, MaybeTenant};
