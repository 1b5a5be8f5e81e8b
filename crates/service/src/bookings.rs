//! Booking-specific rules: who may list which bookings, and the status update.

use serde_json::Value;

use crate::auth::{AuthError, SessionClaims};
use crate::errors::ServiceError;
use crate::store::{Document, DocumentStore, Filter, FindOptions, UpdateResult};

pub const EMAIL_FIELD: &str = "email";
pub const CONFIRMATION_STATUS_FIELD: &str = "confirmationStatus";

/// The requested `email` must equal the session's `email` claim exactly.
/// Both absent is a match; a non-string claim never matches a requested email.
pub fn authorize_listing(claims: &SessionClaims, requested_email: Option<&str>) -> Result<(), AuthError> {
    let allowed = match (requested_email, claims.email_claim()) {
        (None, None) => true,
        (Some(requested), Some(Value::String(owner))) => requested == owner,
        _ => false,
    };
    if allowed { Ok(()) } else { Err(AuthError::Forbidden) }
}

/// Bookings for one email, or every booking when no email is given.
pub fn listing_filter(email: Option<&str>) -> Filter {
    match email {
        Some(e) if !e.is_empty() => Filter::eq(EMAIL_FIELD, Value::String(e.to_string())),
        _ => Filter::all(),
    }
}

pub async fn list_bookings(store: &dyn DocumentStore, email: Option<&str>) -> Result<Vec<Document>, ServiceError> {
    store.find(&listing_filter(email), &FindOptions::default()).await
}

/// `$set` document for a status change. A missing status is stored as null.
pub fn confirmation_update(body: &Document) -> Document {
    let status = body.get(CONFIRMATION_STATUS_FIELD).cloned().unwrap_or(Value::Null);
    let mut set = Document::new();
    set.insert(CONFIRMATION_STATUS_FIELD.to_string(), status);
    set
}

pub async fn set_confirmation_status(
    store: &dyn DocumentStore,
    id: &str,
    body: &Document,
) -> Result<UpdateResult, ServiceError> {
    store.update_one(&Filter::by_id(id), confirmation_update(body)).await
}
