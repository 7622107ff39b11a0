//! Document store abstraction.
//!
//! A store keeps JSON documents in named collections. Each document has an
//! `id` (UUID string), an optional `tenantId`, and a `revision` counter that
//! the store maintains. Stores know nothing about tenancy rules; those are
//! applied by the isolation guard before a call reaches the store.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{Document, Filter};

/// Field names every stored document uses.
pub mod fields {
    /// Primary identifier.
    pub const ID: &str = "id";
    /// Owning tenant.
    pub const TENANT_ID: &str = "tenantId";
    /// Compare-and-swap revision.
    pub const REVISION: &str = "revision";
}

/// Static description of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionSpec {
    /// Collection name.
    pub name: &'static str,
    /// Field that must be unique per `(tenantId, value)`, if any.
    pub natural_key: Option<&'static str>,
}

impl CollectionSpec {
    /// A collection without a natural key.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            natural_key: None,
        }
    }

    /// A collection with a natural key unique within each tenant.
    pub const fn with_natural_key(name: &'static str, key: &'static str) -> Self {
        Self {
            name,
            natural_key: Some(key),
        }
    }
}

/// Backend for document persistence (in-memory or PostgreSQL).
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new document. The store sets `revision` to 1.
    ///
    /// Fails with `Conflict` if the id or the natural key is taken.
    async fn insert(&self, collection: &CollectionSpec, doc: Document) -> AppResult<Document>;

    /// Return every document matching the filter.
    async fn find(&self, collection: &CollectionSpec, filter: &Filter) -> AppResult<Vec<Document>>;

    /// Replace the single document matching `filter` if its revision equals
    /// `expected_revision`. The store bumps the revision.
    ///
    /// Fails with `NotFound` if nothing matches and `Conflict` if the
    /// revision moved or the new natural key is taken.
    async fn replace(
        &self,
        collection: &CollectionSpec,
        filter: &Filter,
        doc: Document,
        expected_revision: u64,
    ) -> AppResult<Document>;

    /// Atomically add one to an integer `field` of the single document
    /// matching `filter`, bumping its revision. Returns the updated document,
    /// or `None` if nothing matches.
    async fn increment(
        &self,
        collection: &CollectionSpec,
        filter: &Filter,
        field: &str,
    ) -> AppResult<Option<Document>>;

    /// Delete every document matching the filter, returning the count.
    async fn delete(&self, collection: &CollectionSpec, filter: &Filter) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
