//! [`DocumentStore`](formhub_core::traits::DocumentStore) implementations.

pub mod memory;
pub mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

use serde_json::Value;
use uuid::Uuid;

use formhub_core::error::AppError;
use formhub_core::result::AppResult;
use formhub_core::traits::store::fields;
use formhub_core::types::Document;

/// Parse the `id` field of a document.
pub(crate) fn document_id(doc: &Document) -> AppResult<Uuid> {
    doc.get(fields::ID)
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| AppError::validation("Document is missing a valid 'id'"))
}

/// Parse the `tenantId` field of a document, if present.
pub(crate) fn document_tenant(doc: &Document) -> AppResult<Option<Uuid>> {
    match doc.get(fields::TENANT_ID) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| AppError::validation("Document has an invalid 'tenantId'")),
        Some(_) => Err(AppError::validation("Document has an invalid 'tenantId'")),
    }
}

/// Read the natural key value of a document as text.
pub(crate) fn natural_key_value(doc: &Document, key: Option<&str>) -> Option<String> {
    let value = doc.get(key?)?;
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Read the `revision` field of a document.
pub(crate) fn document_revision(doc: &Document) -> u64 {
    doc.get(fields::REVISION)
        .and_then(Value::as_u64)
        .unwrap_or(0)
}
