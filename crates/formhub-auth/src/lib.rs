//! # formhub-auth
//!
//! Identity and access for FormHub tenants.
//!
//! ## Modules
//!
//! - `tenant`: public tenant key resolution with a bounded TTL cache
//! - `jwt`: access and refresh credential encoding and decoding
//! - `token`: issue, rotate, and revoke credentials via the per-user token version
//! - `password`: Argon2id password hashing and policy enforcement
//! - `session`: per-request principal attachment and the login/refresh/logout flows
//! - `rbac`: effective permissions from group-scoped role assignments

pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;
pub mod tenant;
pub mod token;

pub use jwt::{AccessClaims, JwtDecoder, JwtEncoder, RefreshClaims};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{GroupContext, RbacResolver, RoleCatalog};
pub use session::{AuthenticatedPrincipal, GuardMode, PrincipalView, SessionGuard, SessionManager};
pub use tenant::{ResolvedTenant, TenantResolver};
pub use token::{RefreshOutcome, TokenPair, TokenService};

#[cfg(test)]
pub(crate) mod testing;
