use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use service::store::{Document, InsertOneResult};

use super::{auth::ServerState, documents};
use crate::errors::ApiError;
use crate::extract::{parse_document, DocumentBody};

/// Prefix of the legacy `/appliedUsers:id` route; any suffix is accepted and ignored.
pub const LEGACY_PREFIX: &str = "/appliedUsers";

#[utoipa::path(post, path = "/appliedUsers", tag = "appliedUsers", request_body = crate::openapi::DocumentDoc, responses((status = 200, description = "Inserted", body = crate::openapi::InsertOneResultDoc), (status = 400, description = "Bad Request")))]
pub async fn create(
    State(state): State<ServerState>,
    DocumentBody(doc): DocumentBody,
) -> Result<Json<InsertOneResult>, ApiError> {
    documents::insert(&*state.db.applied_users, doc).await.map(Json)
}

#[utoipa::path(get, path = "/appliedUsers", tag = "appliedUsers", request_body = crate::openapi::DocumentDoc, responses((status = 200, description = "Matching documents", body = [crate::openapi::DocumentDoc])))]
pub async fn list(
    State(state): State<ServerState>,
    DocumentBody(filter): DocumentBody,
) -> Result<Json<Vec<Document>>, ApiError> {
    documents::find_by_body(&*state.db.applied_users, &filter).await.map(Json)
}

/// `GET /appliedUsers<anything>`: first document matching the body filter, or `null`.
///
/// Installed as the router fallback since the path has no segment boundary
/// before the suffix; every other unmatched request still gets a 404.
#[utoipa::path(get, path = "/appliedUsers{id}", tag = "appliedUsers", params(("id" = String, Path, description = "Ignored suffix")), request_body = crate::openapi::DocumentDoc, responses((status = 200, description = "First match or null", body = crate::openapi::DocumentDoc)))]
pub async fn find_one(
    State(state): State<ServerState>,
    method: Method,
    uri: axum::http::Uri,
    body: Bytes,
) -> Response {
    if method != Method::GET || !is_legacy_path(uri.path()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    let filter = match parse_document(&body) {
        Ok(filter) => filter,
        Err(e) => return e.into_response(),
    };
    match documents::find_one_by_body(&*state.db.applied_users, &filter).await {
        Ok(doc) => Json(doc).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `/appliedUsers<suffix>` with a non-empty, single-segment suffix; one trailing `/` is allowed.
fn is_legacy_path(path: &str) -> bool {
    path.strip_prefix(LEGACY_PREFIX)
        .map(|suffix| suffix.strip_suffix('/').unwrap_or(suffix))
        .is_some_and(|suffix| !suffix.is_empty() && !suffix.contains('/'))
}
