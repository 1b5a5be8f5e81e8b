use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use service::auth::SessionClaims;
use service::bookings;
use service::store::{DeleteResult, Document, Filter, InsertOneResult, UpdateResult};
use tracing::info;

use super::{auth::ServerState, documents};
use crate::errors::ApiError;
use crate::extract::DocumentBody;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct OwnerQuery {
    /// Owner email; must match the session
    pub email: Option<String>,
}

#[utoipa::path(post, path = "/bookings", tag = "bookings", request_body = crate::openapi::DocumentDoc, responses((status = 200, description = "Inserted", body = crate::openapi::InsertOneResultDoc)))]
pub async fn create(
    State(state): State<ServerState>,
    DocumentBody(doc): DocumentBody,
) -> Result<Json<InsertOneResult>, ApiError> {
    let result = documents::insert(&*state.db.bookings, doc).await?;
    info!(event = "booking_created", id = %result.inserted_id, "booking created");
    Ok(Json(result))
}

#[utoipa::path(get, path = "/bookingsAll", tag = "bookings", request_body = crate::openapi::DocumentDoc, responses((status = 200, description = "Matching bookings", body = [crate::openapi::DocumentDoc])))]
pub async fn list_all(
    State(state): State<ServerState>,
    DocumentBody(filter): DocumentBody,
) -> Result<Json<Vec<Document>>, ApiError> {
    documents::find_by_body(&*state.db.bookings, &filter).await.map(Json)
}

/// Bookings of the signed-in user. Requires the session cookie; asking for
/// someone else's email is forbidden.
#[utoipa::path(get, path = "/bookings", tag = "bookings", params(OwnerQuery), responses((status = 200, description = "Bookings", body = [crate::openapi::DocumentDoc]), (status = 401, description = "Unauthorized", body = crate::openapi::MessageDoc), (status = 403, description = "Forbidden", body = crate::openapi::MessageDoc)))]
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(claims): Extension<SessionClaims>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let email = query.email.as_deref();
    bookings::authorize_listing(&claims, email)?;
    let docs = bookings::list_bookings(&*state.db.bookings, email).await?;
    Ok(Json(docs))
}

#[utoipa::path(delete, path = "/bookings/{id}", tag = "bookings", params(("id" = String, Path, description = "Booking id")), responses((status = 200, description = "Delete result", body = crate::openapi::DeleteResultDoc)))]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state.db.bookings.delete_one(&Filter::by_id(&id)).await?;
    info!(id = %id, deleted = result.deleted_count, "booking delete");
    Ok(Json(result))
}

#[utoipa::path(patch, path = "/bookings/{id}", tag = "bookings", params(("id" = String, Path, description = "Booking id")), request_body = crate::openapi::ConfirmationDoc, responses((status = 200, description = "Update result", body = crate::openapi::UpdateResultDoc)))]
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    DocumentBody(body): DocumentBody,
) -> Result<Json<UpdateResult>, ApiError> {
    let result = bookings::set_confirmation_status(&*state.db.bookings, &id, &body).await?;
    info!(id = %id, matched = result.matched_count, modified = result.modified_count, "booking status update");
    Ok(Json(result))
}
