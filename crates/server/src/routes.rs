pub mod applied_users;
pub mod auth;
pub mod bookings;
pub mod documents;
pub mod products;
pub mod services;

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use common::types::LIVENESS_MESSAGE;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Server is running", body = String)))]
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: open routes, the session-gated
/// booking listing, and the legacy applied-user lookup as fallback.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(liveness))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/jwt", post(auth::issue_jwt))
        .route("/appliedUsers", post(applied_users::create).get(applied_users::list))
        .route("/services", get(services::list))
        .route("/services1", get(services::search))
        .route("/services/:id", get(services::get))
        .route("/products", post(products::create).get(products::list))
        .route("/products/:id", get(products::get))
        .route("/bookings", post(bookings::create))
        .route("/bookingsAll", get(bookings::list_all))
        .route("/bookings/:id", axum::routing::delete(bookings::delete).patch(bookings::update_status));

    // only the owner listing needs a session; POST /bookings above stays open
    let protected = Router::new()
        .route("/bookings", get(bookings::list_mine))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_session));

    public
        .merge(protected)
        .fallback(applied_users::find_one)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
