//! HTTP-level integration tests against the in-memory store.

mod helpers;

mod auth_test;
mod isolation_test;
mod permission_test;
mod tenant_test;
