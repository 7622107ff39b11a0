//! Per-request principal attachment and session flows.

pub mod guard;
pub mod manager;
pub mod principal;

pub use guard::{AuthenticatedPrincipal, GuardMode, SessionGuard};
pub use manager::{LoginResult, RegisterInput, SessionManager};
pub use principal::PrincipalView;
