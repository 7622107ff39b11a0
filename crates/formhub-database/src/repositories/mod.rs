//! Typed repositories over the document store.
//!
//! Tenant records are global and use the store directly. Users and groups
//! are tenant-scoped and every call goes through the isolation guard.

pub mod group;
pub mod tenant;
pub mod user;

pub use group::GroupRepository;
pub use tenant::TenantRepository;
pub use user::UserRepository;

use formhub_entity::group::Group;
use formhub_entity::user::User;

use crate::isolation::TenantIsolationGuard;

/// Register every tenant-scoped entity type with the guard.
pub fn register_entities(guard: &TenantIsolationGuard) {
    guard.register::<User>();
    guard.register::<Group>();
}
