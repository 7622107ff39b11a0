//! In-memory document store.
//!
//! Used for development and the test suites. All collections live behind a
//! single async `RwLock`, so every write is atomic with respect to reads.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::traits::store::fields;
use formhub_core::traits::{CollectionSpec, DocumentStore};
use formhub_core::types::{Document, Filter};

use super::{document_id, document_revision, document_tenant, natural_key_value};

type Collection = BTreeMap<Uuid, Document>;

/// A process-local [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<&'static str, Collection>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Fail with `Conflict` if another document in the collection has the same
/// `(tenantId, natural key)` pair.
fn check_natural_key(
    spec: &CollectionSpec,
    docs: &Collection,
    doc: &Document,
    own_id: Uuid,
) -> AppResult<()> {
    let Some(value) = natural_key_value(doc, spec.natural_key) else {
        return Ok(());
    };
    let tenant = document_tenant(doc)?;
    for (id, other) in docs {
        if *id == own_id {
            continue;
        }
        if natural_key_value(other, spec.natural_key).as_deref() == Some(value.as_str())
            && document_tenant(other)? == tenant
        {
            return Err(AppError::conflict(format!(
                "{} with {} '{}' already exists",
                spec.name,
                spec.natural_key.unwrap_or("key"),
                value
            )));
        }
    }
    Ok(())
}

/// Return the id of the single document matching `filter`.
fn single_match(spec: &CollectionSpec, docs: &Collection, filter: &Filter) -> AppResult<Option<Uuid>> {
    let mut matches = docs.iter().filter(|(_, d)| filter.matches(d)).map(|(id, _)| *id);
    let first = matches.next();
    if first.is_some() && matches.next().is_some() {
        return Err(AppError::internal(format!(
            "Filter matched more than one {} document",
            spec.name
        )));
    }
    Ok(first)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, spec: &CollectionSpec, mut doc: Document) -> AppResult<Document> {
        let id = document_id(&doc)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(spec.name).or_default();

        if docs.contains_key(&id) {
            return Err(AppError::conflict(format!("{} {id} already exists", spec.name)));
        }
        check_natural_key(spec, docs, &doc, id)?;

        doc.insert(fields::REVISION.to_string(), Value::from(1u64));
        docs.insert(id, doc.clone());
        debug!(collection = spec.name, %id, "Inserted document");
        Ok(doc)
    }

    async fn find(&self, spec: &CollectionSpec, filter: &Filter) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(spec.name)
            .map(|docs| {
                docs.values()
                    .filter(|d| filter.matches(d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn replace(
        &self,
        spec: &CollectionSpec,
        filter: &Filter,
        mut doc: Document,
        expected_revision: u64,
    ) -> AppResult<Document> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(spec.name).or_default();

        let id = single_match(spec, docs, filter)?
            .ok_or_else(|| AppError::not_found(format!("{} not found", spec.name)))?;
        let current = docs
            .get(&id)
            .map(document_revision)
            .unwrap_or_default();
        if current != expected_revision {
            return Err(AppError::conflict(format!(
                "{} {id} was modified concurrently (revision {current}, expected {expected_revision})",
                spec.name
            )));
        }

        doc.insert(fields::ID.to_string(), Value::String(id.to_string()));
        check_natural_key(spec, docs, &doc, id)?;
        doc.insert(fields::REVISION.to_string(), Value::from(current + 1));
        docs.insert(id, doc.clone());
        Ok(doc)
    }

    async fn increment(
        &self,
        spec: &CollectionSpec,
        filter: &Filter,
        field: &str,
    ) -> AppResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(spec.name).or_default();

        let Some(id) = single_match(spec, docs, filter)? else {
            return Ok(None);
        };
        let Some(doc) = docs.get_mut(&id) else {
            return Ok(None);
        };
        let next = doc.get(field).and_then(Value::as_u64).unwrap_or(0) + 1;
        let revision = document_revision(doc) + 1;
        doc.insert(field.to_string(), Value::from(next));
        doc.insert(fields::REVISION.to_string(), Value::from(revision));
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, spec: &CollectionSpec, filter: &Filter) -> AppResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(spec.name) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|_, d| !filter.matches(d));
        Ok((before - docs.len()) as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
