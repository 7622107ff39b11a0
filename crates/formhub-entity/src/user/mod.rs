//! User (principal) domain entities.

pub mod membership;
pub mod model;
pub mod status;

pub use membership::{Membership, Memberships};
pub use model::{CreateUser, NewUser, User};
pub use status::UserStatus;
