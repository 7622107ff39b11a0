//! # formhub-service
//!
//! Administrative use cases on top of the identity core. Each service
//! orchestrates repositories, the RBAC resolver, and the token service.
//!
//! Services follow constructor injection; all dependencies are provided
//! at construction time.

pub mod context;
pub mod group;
pub mod tenant;
pub mod user;

pub use context::RequestContext;
pub use group::GroupService;
pub use tenant::TenantService;
pub use user::UserAdminService;

#[cfg(test)]
pub(crate) mod testing;
