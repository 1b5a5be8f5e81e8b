use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::Document;

/// Reserved registered claims the token service sets itself.
pub const RESERVED_CLAIMS: [&str; 2] = ["exp", "iat"];

/// Decoded session token payload.
///
/// `identity` is whatever object the client submitted at login, embedded
/// verbatim; only `iat`/`exp` are added on top.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    #[serde(flatten)]
    pub identity: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    pub exp: i64,
}

impl SessionClaims {
    /// Raw `email` claim; may be any JSON type since the identity is unvalidated.
    pub fn email_claim(&self) -> Option<&Value> {
        self.identity.get("email")
    }

    pub fn email(&self) -> Option<&str> {
        self.email_claim().and_then(Value::as_str)
    }
}
