//! Tenant isolation: the single enforcement point that scopes storage
//! reads and writes to the active tenant.

pub mod context;
pub mod guard;

pub use context::TenantContext;
pub use guard::TenantIsolationGuard;
