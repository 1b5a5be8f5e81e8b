//! Service catalog queries: text search on the service name and price ordering.

use serde::Deserialize;

use crate::errors::ServiceError;
use crate::store::{Document, DocumentStore, Filter, FindOptions, Sort};

pub const SERVICE_NAME_FIELD: &str = "serviceName";
pub const PRICE_FIELD: &str = "price";
/// `sort` value selecting ascending price; anything else sorts descending.
pub const ASCENDING_SORT: &str = "acd";

/// Query string accepted by the searchable service listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceListQuery {
    pub search: Option<String>,
    pub sort: Option<String>,
}

impl ServiceListQuery {
    /// Build the store filter and sort options. `search` is a case-insensitive
    /// pattern; plain words behave as substring matches.
    pub fn to_find(&self) -> Result<(Filter, FindOptions), ServiceError> {
        let filter = match self.search.as_deref() {
            Some(term) if !term.is_empty() => Filter::regex(SERVICE_NAME_FIELD, term, true)?,
            _ => Filter::all(),
        };
        let sort = if self.sort.as_deref() == Some(ASCENDING_SORT) {
            Sort::ascending(PRICE_FIELD)
        } else {
            Sort::descending(PRICE_FIELD)
        };
        Ok((filter, FindOptions::sorted(sort)))
    }
}

pub async fn search_services(store: &dyn DocumentStore, query: &ServiceListQuery) -> Result<Vec<Document>, ServiceError> {
    let (filter, options) = query.to_find()?;
    store.find(&filter, &options).await
}
