//! # formhub-entity
//!
//! Domain entity models for FormHub identity: tenants, users with their
//! embedded group memberships, groups, and the role/permission catalog
//! types. Stored entities serialize with camelCase field names and carry a
//! `revision` for compare-and-swap replaces.

pub mod group;
pub mod role;
pub mod tenant;
pub mod user;
