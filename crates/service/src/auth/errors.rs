use thiserror::Error;

/// Business errors for the session token workflow
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing session token")]
    MissingToken,
    #[error("invalid session token: {0}")]
    InvalidToken(String),
    #[error("invalid identity claim: {0}")]
    InvalidClaims(String),
    #[error("identity does not own the requested resource")]
    Forbidden,
    #[error("token error: {0}")]
    TokenError(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::MissingToken => 1001,
            AuthError::InvalidToken(_) => 1002,
            AuthError::InvalidClaims(_) => 1003,
            AuthError::Forbidden => 1004,
            AuthError::TokenError(_) => 1102,
        }
    }

    /// Missing or unverifiable credentials, as opposed to a refused identity.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, AuthError::MissingToken | AuthError::InvalidToken(_))
    }
}
