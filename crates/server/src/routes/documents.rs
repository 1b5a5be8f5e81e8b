//! Shared handler bodies for the plain CRUD routes.

use service::store::{Document, DocumentStore, Filter, FindOptions, InsertOneResult};
use tracing::debug;

use crate::errors::ApiError;

pub async fn insert(store: &dyn DocumentStore, doc: Document) -> Result<InsertOneResult, ApiError> {
    let result = store.insert_one(doc).await?;
    debug!(collection = store.name(), id = %result.inserted_id, "document inserted");
    Ok(result)
}

/// Every document matching the request body used as a filter.
pub async fn find_by_body(store: &dyn DocumentStore, body: &Document) -> Result<Vec<Document>, ApiError> {
    let filter = Filter::parse(body)?;
    Ok(store.find(&filter, &FindOptions::default()).await?)
}

pub async fn find_one_by_body(store: &dyn DocumentStore, body: &Document) -> Result<Option<Document>, ApiError> {
    let filter = Filter::parse(body)?;
    Ok(store.find_one(&filter).await?)
}

pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<Document>, ApiError> {
    Ok(store.find_one(&Filter::by_id(id)).await?)
}
