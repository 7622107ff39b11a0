//! Filter types for document queries.
//!
//! Stores evaluate a [`Filter`] as a conjunction of [`FilterField`]
//! conditions against the top-level fields of a JSON document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored document: a JSON object.
pub type Document = serde_json::Map<String, Value>;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// Not equal (a missing field counts as not equal).
    Ne,
    /// List membership.
    In,
}

/// A dynamic filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A string value.
    String(String),
    /// An integer value.
    Integer(i64),
    /// A boolean value.
    Boolean(bool),
    /// A list of string values (for `In`).
    StringList(Vec<String>),
}

impl FilterValue {
    /// Textual form used by stores that compare on `->>` extraction.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::Integer(i) => Some(i.to_string()),
            Self::Boolean(b) => Some(b.to_string()),
            Self::StringList(_) => None,
        }
    }

    /// Whether a JSON field value equals this filter value.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String(expected), Value::String(actual)) => expected == actual,
            (Self::Integer(expected), Value::Number(actual)) => actual.as_i64() == Some(*expected),
            (Self::Boolean(expected), Value::Bool(actual)) => expected == actual,
            (Self::StringList(list), Value::String(actual)) => list.iter().any(|s| s == actual),
            _ => false,
        }
    }
}

/// A single filter condition on a named field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The top-level document field name.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter on a string value.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.into()))
    }

    /// Shorthand for an inequality filter on a string value.
    pub fn ne(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Ne, FilterValue::String(value.into()))
    }

    /// Evaluate this condition against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        let field = doc.get(&self.field);
        match self.op {
            FilterOp::Eq | FilterOp::In => field.is_some_and(|v| self.value.matches(v)),
            FilterOp::Ne => !field.is_some_and(|v| self.value.matches(v)),
        }
    }
}

/// A conjunction of filter conditions. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// The conditions, all of which must hold.
    pub fields: Vec<FilterField>,
}

impl Filter {
    /// An empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition (builder style).
    pub fn and(mut self, field: FilterField) -> Self {
        self.fields.push(field);
        self
    }

    /// Shorthand for `and(FilterField::eq(..))`.
    pub fn eq(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.and(FilterField::eq(field, value))
    }

    /// Remove every condition on `field`.
    pub fn without(mut self, field: &str) -> Self {
        self.fields.retain(|f| f.field != field);
        self
    }

    /// Whether any condition mentions `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// Evaluate the conjunction against a document.
    pub fn matches(&self, doc: &Document) -> bool {
        self.fields.iter().all(|f| f.matches(doc))
    }
}
