//! Group administration.

pub mod service;

pub use service::GroupService;
