//! User administration: invites, memberships, status, sessions.

pub mod service;

pub use service::{InviteUser, MembershipInput, UserAdminService};
