use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use service::catalog::{self, ServiceListQuery};
use service::store::{Document, Filter, FindOptions};
use tracing::error;

use super::{auth::ServerState, documents};
use crate::errors::ApiError;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive match on `serviceName`
    pub search: Option<String>,
    /// `acd` for ascending price, anything else descending
    pub sort: Option<String>,
}

impl From<SearchQuery> for ServiceListQuery {
    fn from(q: SearchQuery) -> Self {
        ServiceListQuery { search: q.search, sort: q.sort }
    }
}

#[utoipa::path(get, path = "/services", tag = "services", responses((status = 200, description = "All services", body = [crate::openapi::DocumentDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Document>>, ApiError> {
    let docs = state.db.services.find(&Filter::all(), &FindOptions::default()).await?;
    Ok(Json(docs))
}

/// Searchable, price-sorted listing used by the storefront.
#[utoipa::path(get, path = "/services1", tag = "services", params(SearchQuery), responses((status = 200, description = "Matching services", body = [crate::openapi::DocumentDoc]), (status = 500, description = "Internal Server Error")))]
pub async fn search(
    State(state): State<ServerState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let query = match query {
        Ok(Query(q)) => ServiceListQuery::from(q),
        Err(e) => {
            error!(err = %e, "service search query rejected");
            return Err(ApiError::SearchFailure);
        }
    };
    match catalog::search_services(&*state.db.services, &query).await {
        Ok(docs) => Ok(Json(docs)),
        Err(e) => {
            error!(err = %e, search = ?query.search, "service search failed");
            Err(ApiError::SearchFailure)
        }
    }
}

#[utoipa::path(get, path = "/services/{id}", tag = "services", params(("id" = String, Path, description = "Service id")), responses((status = 200, description = "Service or null", body = crate::openapi::DocumentDoc)))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    documents::find_by_id(&*state.db.services, &id).await.map(Json)
}
