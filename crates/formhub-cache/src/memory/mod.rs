//! In-memory cache implementation.

pub mod ttl;

pub use ttl::TtlCache;
