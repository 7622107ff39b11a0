//! Core traits that define the boundaries between FormHub crates.

pub mod clock;
pub mod scoped;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use scoped::TenantScoped;
pub use store::{CollectionSpec, DocumentStore};
