//! Credential issuance, rotation, and revocation.

pub mod service;

pub use service::{RefreshOutcome, TokenPair, TokenService};
