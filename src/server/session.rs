use super::api_error::ApiError;
use super::state::ServerState;
use crate::oidc::IdentityClaim;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use std::convert::Infallible;
use tracing::debug;

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

/// A caller allowed through the login gate.
///
/// `identity` is `None` when the server runs without `require_login`.
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub identity: Option<IdentityClaim>,
}

fn extract_session_token_from_cookies(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(|c| c.value().to_string())
}

fn extract_session_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(HEADER_SESSION_TOKEN_KEY)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!token.is_empty()).then(|| token.to_string())
}

pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    extract_session_token_from_cookies(headers)
        .or_else(|| extract_session_token_from_headers(headers))
}

async fn lookup_identity(parts: &Parts, ctx: &ServerState) -> Option<IdentityClaim> {
    let Some(token) = extract_session_token(&parts.headers) else {
        debug!("No token in cookies nor headers.");
        return None;
    };
    let identity = ctx.session_store.get(&token).await;
    if identity.is_none() {
        debug!("Session token not found");
    }
    identity
}

impl FromRequestParts<ServerState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let identity = lookup_identity(parts, ctx).await;
        if ctx.config.require_login && identity.is_none() {
            return Err(ApiError::Unauthorized);
        }
        Ok(AuthenticatedUser { identity })
    }
}

impl OptionalFromRequestParts<ServerState> for AuthenticatedUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(lookup_identity(parts, ctx)
            .await
            .map(|identity| AuthenticatedUser {
                identity: Some(identity),
            }))
    }
}
