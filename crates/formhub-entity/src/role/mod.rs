//! Role and permission domain entities.

pub mod model;
pub mod permission;

pub use model::{Role, RoleStatus};
pub use permission::{Permission, PermissionSet};
