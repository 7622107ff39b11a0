//! Shared value types.

pub mod filter;
pub mod id;

pub use filter::{Document, Filter, FilterField, FilterOp, FilterValue};
pub use id::{GroupId, TenantId, UserId};
