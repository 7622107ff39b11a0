//! PostgreSQL document store.
//!
//! Every collection shares the `documents` table; the JSON body is stored in
//! a `jsonb` column and filters compare `body->>'field'` as text.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::Postgres;
use sqlx::{PgPool, QueryBuilder};
use tracing::debug;

use formhub_core::error::{AppError, ErrorKind};
use formhub_core::result::AppResult;
use formhub_core::traits::store::fields;
use formhub_core::traits::{CollectionSpec, DocumentStore};
use formhub_core::types::{Document, Filter, FilterOp, FilterValue};

use super::{document_id, document_tenant, natural_key_value};

/// A [`DocumentStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error, turning unique violations into `Conflict`.
fn map_db_error(context: &str, err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return AppError::conflict(format!(
                "{context}: a document with that key already exists"
            ));
        }
    }
    AppError::with_source(ErrorKind::Database, format!("{context}: {err}"), err)
}

/// Append `AND ...` conditions for each filter field.
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) -> AppResult<()> {
    for field in &filter.fields {
        match (field.op, &field.value) {
            (FilterOp::In, FilterValue::StringList(list)) => {
                qb.push(" AND body->>");
                qb.push_bind(field.field.clone());
                qb.push(" = ANY(");
                qb.push_bind(list.clone());
                qb.push(")");
            }
            (FilterOp::In, _) => {
                return Err(AppError::validation("'in' filters take a list of strings"));
            }
            (op, value) => {
                let text = value
                    .as_text()
                    .ok_or_else(|| AppError::validation("List values only apply to 'in' filters"))?;
                qb.push(" AND body->>");
                qb.push_bind(field.field.clone());
                qb.push(if op == FilterOp::Eq {
                    " = "
                } else {
                    " IS DISTINCT FROM "
                });
                qb.push_bind(text);
            }
        }
    }
    Ok(())
}

fn into_document(value: Value) -> AppResult<Document> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::internal("Stored document body is not an object")),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, spec: &CollectionSpec, mut doc: Document) -> AppResult<Document> {
        let id = document_id(&doc)?;
        let tenant_id = document_tenant(&doc)?;
        let natural_key = natural_key_value(&doc, spec.natural_key);
        doc.insert(fields::REVISION.to_string(), Value::from(1u64));

        sqlx::query(
            "INSERT INTO documents (collection, id, tenant_id, natural_key, revision, body) \
             VALUES ($1, $2, $3, $4, 1, $5)",
        )
        .bind(spec.name)
        .bind(id)
        .bind(tenant_id)
        .bind(natural_key)
        .bind(Value::Object(doc.clone()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Failed to insert document", e))?;

        debug!(collection = spec.name, %id, "Inserted document");
        Ok(doc)
    }

    async fn find(&self, spec: &CollectionSpec, filter: &Filter) -> AppResult<Vec<Document>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT body FROM documents WHERE collection = ");
        qb.push_bind(spec.name);
        push_filter(&mut qb, filter)?;
        qb.push(" ORDER BY id");

        let rows: Vec<(Value,)> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to query documents", e))?;
        rows.into_iter().map(|(body,)| into_document(body)).collect()
    }

    async fn replace(
        &self,
        spec: &CollectionSpec,
        filter: &Filter,
        mut doc: Document,
        expected_revision: u64,
    ) -> AppResult<Document> {
        let existing = self.find(spec, filter).await?;
        let current = match existing.as_slice() {
            [] => return Err(AppError::not_found(format!("{} not found", spec.name))),
            [one] => one,
            _ => {
                return Err(AppError::internal(format!(
                    "Filter matched more than one {} document",
                    spec.name
                )));
            }
        };
        let id = document_id(current)?;
        let next_revision = expected_revision + 1;
        doc.insert(fields::ID.to_string(), Value::String(id.to_string()));
        doc.insert(fields::REVISION.to_string(), Value::from(next_revision));
        let natural_key = natural_key_value(&doc, spec.natural_key);

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE documents SET body = ");
        qb.push_bind(Value::Object(doc.clone()));
        qb.push(", natural_key = ");
        qb.push_bind(natural_key);
        qb.push(", revision = ");
        qb.push_bind(next_revision as i64);
        qb.push(", updated_at = NOW() WHERE collection = ");
        qb.push_bind(spec.name);
        qb.push(" AND id = ");
        qb.push_bind(id);
        qb.push(" AND revision = ");
        qb.push_bind(expected_revision as i64);
        push_filter(&mut qb, filter)?;

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to replace document", e))?;
        if result.rows_affected() == 0 {
            return Err(AppError::conflict(format!(
                "{} {id} was modified concurrently (expected revision {expected_revision})",
                spec.name
            )));
        }
        Ok(doc)
    }

    async fn increment(
        &self,
        spec: &CollectionSpec,
        filter: &Filter,
        field: &str,
    ) -> AppResult<Option<Document>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "UPDATE documents SET revision = revision + 1, updated_at = NOW(), \
             body = jsonb_set(jsonb_set(body, ARRAY[",
        );
        qb.push_bind(field.to_string());
        qb.push("]::text[], to_jsonb(COALESCE((body->>");
        qb.push_bind(field.to_string());
        qb.push(")::bigint, 0) + 1)), '{revision}', to_jsonb(revision + 1)) WHERE collection = ");
        qb.push_bind(spec.name);
        push_filter(&mut qb, filter)?;
        qb.push(" RETURNING body");

        let rows: Vec<(Value,)> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to increment counter", e))?;
        match rows.len() {
            0 => Ok(None),
            1 => rows
                .into_iter()
                .next()
                .map(|(body,)| into_document(body))
                .transpose(),
            _ => Err(AppError::internal(format!(
                "Increment matched more than one {} document",
                spec.name
            ))),
        }
    }

    async fn delete(&self, spec: &CollectionSpec, filter: &Filter) -> AppResult<u64> {
        let mut qb = QueryBuilder::<Postgres>::new("DELETE FROM documents WHERE collection = ");
        qb.push_bind(spec.name);
        push_filter(&mut qb, filter)?;
        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Failed to delete documents", e))?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
