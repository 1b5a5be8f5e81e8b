use axum::{
    extract::{Path, State},
    Json,
};
use service::store::{Document, InsertOneResult};

use super::{auth::ServerState, documents};
use crate::errors::ApiError;
use crate::extract::DocumentBody;

#[utoipa::path(post, path = "/products", tag = "products", request_body = crate::openapi::DocumentDoc, responses((status = 200, description = "Inserted", body = crate::openapi::InsertOneResultDoc)))]
pub async fn create(
    State(state): State<ServerState>,
    DocumentBody(doc): DocumentBody,
) -> Result<Json<InsertOneResult>, ApiError> {
    documents::insert(&*state.db.products, doc).await.map(Json)
}

#[utoipa::path(get, path = "/products", tag = "products", request_body = crate::openapi::DocumentDoc, responses((status = 200, description = "Matching products", body = [crate::openapi::DocumentDoc])))]
pub async fn list(
    State(state): State<ServerState>,
    DocumentBody(filter): DocumentBody,
) -> Result<Json<Vec<Document>>, ApiError> {
    documents::find_by_body(&*state.db.products, &filter).await.map(Json)
}

#[utoipa::path(get, path = "/products/{id}", tag = "products", params(("id" = String, Path, description = "Product id")), responses((status = 200, description = "Product or null", body = crate::openapi::DocumentDoc)))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, ApiError> {
    documents::find_by_id(&*state.db.products, &id).await.map(Json)
}
