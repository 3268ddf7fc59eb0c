//! Browser login through the configured OpenID Connect provider.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use tracing::{info, warn};

use super::api_error::{ok, ApiError, ApiResult};
use super::session::{extract_session_token, COOKIE_SESSION_TOKEN_KEY};
use super::state::ServerState;

#[derive(Deserialize, Debug)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

fn login_not_configured() -> ApiError {
    ApiError::NotFound("Login is not configured on this server".to_string())
}

async fn login(State(state): State<ServerState>) -> ApiResult {
    let oidc_client = state.oidc_client.as_ref().ok_or_else(login_not_configured)?;

    state.auth_state_store.cleanup_expired().await;
    let (auth_url, auth_state) = oidc_client.authorize_url();
    state.auth_state_store.store(auth_state).await;

    Ok(Redirect::to(&auth_url).into_response())
}

async fn callback(
    State(state): State<ServerState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> ApiResult {
    let oidc_client = state.oidc_client.as_ref().ok_or_else(login_not_configured)?;
    let (Some(code), Some(csrf)) = (query.code, query.state) else {
        return Err(ApiError::BadRequest(
            "Callback needs both code and state".to_string(),
        ));
    };

    let auth_state = state
        .auth_state_store
        .take(&csrf)
        .await
        .ok_or_else(|| ApiError::Forbidden("Unknown or already used login state".to_string()))?;

    let identity = oidc_client
        .exchange_code(&code, &auth_state)
        .await
        .map_err(|e| {
            warn!("OIDC code exchange failed: {:#}", e);
            ApiError::Forbidden("Login failed".to_string())
        })?;

    info!("Login for subject {}", identity.subject);
    let token = state.session_store.open(identity).await;
    let cookie = Cookie::build((COOKIE_SESSION_TOKEN_KEY, token.0))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), Redirect::to("/")).into_response())
}

async fn logout(State(state): State<ServerState>, headers: HeaderMap) -> Response {
    if let Some(token) = extract_session_token(&headers) {
        if let Some(identity) = state.session_store.close(&token).await {
            info!("Logout for subject {}", identity.subject);
        }
    }

    let expired = Cookie::build((COOKIE_SESSION_TOKEN_KEY, ""))
        .path("/")
        .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1))
        .same_site(SameSite::Lax)
        .build();

    (CookieJar::new().add(expired), ok("Logged out", ())).into_response()
}

pub fn make_auth_routes(state: ServerState) -> Router {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/logout", get(logout))
        .with_state(state)
}
