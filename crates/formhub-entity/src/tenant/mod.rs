//! Tenant domain entities.

pub mod model;
pub mod status;

pub use model::{CreateTenant, Tenant, normalize_key};
pub use status::TenantStatus;
