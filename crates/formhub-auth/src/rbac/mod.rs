//! Role-based access control scoped to groups.

pub mod catalog;
pub mod resolver;

pub use catalog::RoleCatalog;
pub use resolver::{GroupContext, RbacResolver};
