//! # formhub-cache
//!
//! Bounded in-process cache built on [moka](https://crates.io/crates/moka).
//! Expiry is decided against an injected [`Clock`](formhub_core::traits::Clock)
//! so that time-to-live behaviour is testable without sleeping.

pub mod memory;

pub use memory::TtlCache;
