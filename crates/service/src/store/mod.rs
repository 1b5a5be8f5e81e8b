//! Document store abstraction
//!
//! Collections hold schemaless JSON documents keyed by `_id`. Handlers talk to
//! collections only through [`DocumentStore`], so the backing implementation
//! can be swapped without touching the HTTP layer.

pub mod database;
pub mod filter;
pub mod json_collection;

use std::cmp::Ordering;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;

pub use database::Database;
pub use filter::Filter;
pub use json_collection::JsonCollection;

/// A schemaless record.
pub type Document = Map<String, Value>;

pub const ID_FIELD: &str = "_id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Ascending }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self { field: field.into(), direction: SortDirection::Descending }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Option<Sort>,
}

impl FindOptions {
    pub fn sorted(sort: Sort) -> Self {
        Self { sort: Some(sort) }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Value>,
    pub upserted_count: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// One named collection of documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn name(&self) -> &str;

    /// Insert a document, generating `_id` when absent.
    async fn insert_one(&self, doc: Document) -> Result<InsertOneResult, ServiceError>;

    async fn find(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<Document>, ServiceError>;

    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, ServiceError>;

    /// Apply `set` (field path -> value) to the first matching document.
    async fn update_one(&self, filter: &Filter, set: Document) -> Result<UpdateResult, ServiceError>;

    async fn delete_one(&self, filter: &Filter) -> Result<DeleteResult, ServiceError>;
}

/// Resolve a dotted path (`a.b.0.c`) inside a document.
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = doc.get(segments.next()?)?;
    for seg in segments {
        current = match current {
            Value::Object(map) => map.get(seg)?,
            Value::Array(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

// missing/null < numbers < strings < objects < arrays < booleans
fn type_rank(v: Option<&Value>) -> u8 {
    match v {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Total order across JSON types, used by sorting and range operators.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (ra, rb) = (type_rank(a), type_rank(b));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x @ Value::Object(_)), Some(y @ Value::Object(_)))
        | (Some(x @ Value::Array(_)), Some(y @ Value::Array(_))) => x.to_string().cmp(&y.to_string()),
        _ => Ordering::Equal,
    }
}

/// Equality with numeric normalization (`1` equals `1.0`).
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => compare_values(Some(a), Some(b)) == Ordering::Equal,
        _ => a == b,
    }
}

/// Stable in-place sort by a single field.
pub fn sort_documents(docs: &mut [Document], sort: &Sort) {
    docs.sort_by(|a, b| {
        let ord = compare_values(lookup(a, &sort.field), lookup(b, &sort.field));
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
