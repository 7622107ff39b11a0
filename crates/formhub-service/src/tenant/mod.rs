//! Tenant lifecycle and operator bootstrap.

pub mod service;

pub use service::{BootstrapAdmin, TenantService};
