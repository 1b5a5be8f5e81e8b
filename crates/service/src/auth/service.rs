use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, instrument};

use super::claims::{SessionClaims, RESERVED_CLAIMS};
use super::errors::AuthError;
use crate::store::Document;

/// Default session validity, matching the long-lived cookie the web client expects.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 1000;

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn with_ttl_hours(secret: &str, hours: u64) -> Self {
        // capped at ~100 years so the timestamp math cannot overflow
        let hours = i64::try_from(hours).unwrap_or(DEFAULT_TOKEN_TTL_HOURS).min(876_000);
        Self::new(secret, Duration::hours(hours))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign an identity object into a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::TokenService;
    /// let svc = TokenService::with_ttl_hours("secret", 1000);
    /// let identity = serde_json::json!({"email": "a@x.com"}).as_object().cloned().unwrap();
    /// let token = svc.issue(identity).unwrap();
    /// let claims = svc.verify(&token).unwrap();
    /// assert_eq!(claims.email(), Some("a@x.com"));
    /// ```
    #[instrument(skip_all)]
    pub fn issue(&self, identity: Document) -> Result<String, AuthError> {
        if let Some(key) = RESERVED_CLAIMS.iter().find(|k| identity.contains_key(**k)) {
            return Err(AuthError::InvalidClaims(format!("'{key}' is set by the server")));
        }
        let now = Utc::now();
        let claims = SessionClaims {
            identity,
            iat: Some(now.timestamp()),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        debug!(exp = claims.exp, "session token issued");
        Ok(token)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}
