//! Request body extraction for schemaless documents.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;
use service::store::Document;

use crate::errors::ApiError;

/// Optional JSON-object body.
///
/// Unlike `Json<T>` this does not insist on a `Content-Type` header and reads
/// an empty body as an empty document, so it also serves GET routes that
/// take their filter from the body.
#[derive(Debug, Clone, Default)]
pub struct DocumentBody(pub Document);

#[async_trait]
impl<S> FromRequest<S> for DocumentBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        parse_document(&bytes).map(DocumentBody)
    }
}

pub fn parse_document(bytes: &[u8]) -> Result<Document, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::new());
    }
    match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ApiError::BadRequest("request body must be a JSON object".into())),
        Err(e) => Err(ApiError::BadRequest(format!("malformed JSON body: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_bodies_are_empty_documents() {
        assert!(parse_document(b"").unwrap().is_empty());
        assert!(parse_document(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn objects_pass_through_and_others_are_rejected() {
        let d = parse_document(br#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(d["email"], "a@x.com");
        assert!(matches!(parse_document(b"[1,2]"), Err(ApiError::BadRequest(_))));
        assert!(matches!(parse_document(b"{oops"), Err(ApiError::BadRequest(_))));
    }
}
