//! Public tenant key resolution.

pub mod resolver;

pub use resolver::{ResolvedTenant, TenantResolver};
