use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use common::types::Success;
use service::auth::{AuthError, TokenService};
use service::store::Database;
use tracing::{debug, info, warn};

use crate::errors::ApiError;
use crate::extract::DocumentBody;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub cookie_name: String,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: Database,
    pub tokens: Arc<TokenService>,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    pub fn new(db: Database, tokens: TokenService, cookie_name: impl Into<String>) -> Self {
        Self {
            db,
            tokens: Arc::new(tokens),
            auth: ServerAuthConfig { cookie_name: cookie_name.into() },
        }
    }
}

/// Sign the submitted identity and hand it back as an HttpOnly session cookie.
#[utoipa::path(post, path = "/jwt", tag = "auth", request_body = crate::openapi::IdentityDoc, responses((status = 200, description = "Cookie set", body = crate::openapi::SuccessDoc), (status = 400, description = "Bad Request")))]
pub async fn issue_jwt(
    State(state): State<ServerState>,
    jar: CookieJar,
    DocumentBody(identity): DocumentBody,
) -> Result<(CookieJar, Json<Success>), ApiError> {
    let email = identity.get("email").and_then(|v| v.as_str()).map(str::to_owned);
    let token = state.tokens.issue(identity)?;
    info!(event = "token_issued", email = ?email, "session cookie issued");
    let mut cookie = Cookie::new(state.auth.cookie_name.clone(), token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    Ok((jar.add(cookie), Json(Success::ok())))
}

/// Route layer for owner-scoped routes: verifies the session cookie and
/// stashes the decoded claims in the request extensions.
pub async fn require_session(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_owned();
    let token = match jar.get(&state.auth.cookie_name).map(Cookie::value) {
        Some(t) if !t.is_empty() => t.to_owned(),
        _ => {
            warn!(path = %path, "missing session cookie");
            return Err(AuthError::MissingToken.into());
        }
    };

    match state.tokens.verify(&token) {
        Ok(claims) => {
            debug!(path = %path, email = ?claims.email(), "session verified");
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(path = %path, code = e.code(), err = %e, "session token rejected");
            Err(e.into())
        }
    }
}
