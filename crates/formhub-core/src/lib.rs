//! # formhub-core
//!
//! Core crate for FormHub. Contains the unified error system,
//! configuration schemas, typed identifiers, query filter types, and the
//! traits that the storage and clock implementations plug into.
//!
//! This crate has **no** internal dependencies on other FormHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
