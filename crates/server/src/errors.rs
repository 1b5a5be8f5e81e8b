use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::Message;
use service::auth::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Error returned by every handler; maps onto a status and a JSON body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized access")]
    Unauthorized,
    #[error("forbidden access")]
    Forbidden,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Store(String),
    /// Failures of the searchable service listing keep their fixed plain-text body.
    #[error("Internal Server Error")]
    SearchFailure,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::SearchFailure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        if e.is_client_error() {
            ApiError::BadRequest(e.to_string())
        } else {
            ApiError::Store(e.to_string())
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken | AuthError::InvalidToken(_) => ApiError::Unauthorized,
            AuthError::Forbidden => ApiError::Forbidden,
            AuthError::InvalidClaims(_) => ApiError::BadRequest(e.to_string()),
            AuthError::TokenError(_) => ApiError::Store(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::SearchFailure => (status, "Internal Server Error").into_response(),
            ApiError::Store(ref msg) => {
                error!(error = %msg, "store operation failed");
                (status, Json(Message::new(msg.clone()))).into_response()
            }
            other => (status, Json(Message::new(other.to_string()))).into_response(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_split_into_client_and_store() {
        let e: ApiError = ServiceError::InvalidFilter("unknown operator $where".into()).into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
        let e: ApiError = ServiceError::Storage("disk full".into()).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn auth_errors_map_to_fixed_messages() {
        let e: ApiError = AuthError::InvalidToken("bad sig".into()).into();
        assert_eq!(e.to_string(), "unauthorized access");
        let e: ApiError = AuthError::Forbidden.into();
        assert_eq!((e.status(), e.to_string()), (StatusCode::FORBIDDEN, "forbidden access".to_string()));
    }
}
