//! OpenID Connect login for gated routes.
//!
//! The identity provider does all the work: the server only builds the
//! authorization redirect (PKCE + CSRF + nonce), exchanges the returned code
//! once, and hands out an opaque session token mapped to the identity claims.

mod sessions;

pub use sessions::{IdentityClaim, SessionStore, SessionToken};

use anyhow::{anyhow, Context, Result};
use openidconnect::core::{CoreAuthenticationFlow, CoreClient, CoreIdTokenClaims, CoreProviderMetadata};
use openidconnect::{
    AuthorizationCode, ClientId, ClientSecret, CsrfToken, IssuerUrl, Nonce, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::OidcConfig;

/// Pending logins older than this are rejected.
pub const AUTH_STATE_MAX_AGE_SECS: i64 = 300;

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("Failed to create HTTP client")
}

/// State kept between `/auth/login` and `/auth/callback`.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub csrf_token: String,
    pub nonce: String,
    pub pkce_verifier: String,
    pub created_at: i64,
}

impl AuthState {
    fn is_expired(&self, now: i64) -> bool {
        now - self.created_at > AUTH_STATE_MAX_AGE_SECS
    }
}

pub struct OidcClient {
    provider_metadata: CoreProviderMetadata,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_url: RedirectUrl,
    scopes: Vec<String>,
}

impl OidcClient {
    /// Discovers the provider's endpoints and keys.
    pub async fn new(config: OidcConfig) -> Result<Self> {
        info!(
            "Initializing OIDC client for provider: {}",
            config.provider_url
        );

        let issuer_url =
            IssuerUrl::new(config.provider_url.clone()).context("Invalid OIDC provider URL")?;
        let provider_metadata = CoreProviderMetadata::discover_async(issuer_url, &http_client()?)
            .await
            .context("Failed to discover OIDC provider metadata")?;
        let redirect_url =
            RedirectUrl::new(config.redirect_uri.clone()).context("Invalid OIDC redirect URI")?;

        Ok(Self {
            provider_metadata,
            client_id: ClientId::new(config.client_id),
            client_secret: ClientSecret::new(config.client_secret),
            redirect_url,
            scopes: config.scopes,
        })
    }

    /// Returns the provider URL to redirect the browser to, and the state to
    /// keep until the callback arrives.
    pub fn authorize_url(&self) -> (String, AuthState) {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone());

        let mut auth_request = client
            .authorize_url(
                CoreAuthenticationFlow::AuthorizationCode,
                CsrfToken::new_random,
                Nonce::new_random,
            )
            .set_pkce_challenge(pkce_challenge);
        for scope in &self.scopes {
            auth_request = auth_request.add_scope(Scope::new(scope.clone()));
        }
        let (auth_url, csrf_token, nonce) = auth_request.url();

        let state = AuthState {
            csrf_token: csrf_token.secret().clone(),
            nonce: nonce.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
            created_at: chrono::Utc::now().timestamp(),
        };
        debug!("Generated authorization URL with state: {}", state.csrf_token);

        (auth_url.to_string(), state)
    }

    /// Exchanges the authorization code and reads the identity claims off the
    /// returned ID token.
    pub async fn exchange_code(&self, code: &str, stored_state: &AuthState) -> Result<IdentityClaim> {
        if stored_state.is_expired(chrono::Utc::now().timestamp()) {
            return Err(anyhow!("Authorization state expired"));
        }

        let client = CoreClient::from_provider_metadata(
            self.provider_metadata.clone(),
            self.client_id.clone(),
            Some(self.client_secret.clone()),
        )
        .set_redirect_uri(self.redirect_url.clone());
        let token_response = client
            .exchange_code(AuthorizationCode::new(code.to_string()))?
            .set_pkce_verifier(PkceCodeVerifier::new(stored_state.pkce_verifier.clone()))
            .request_async(&http_client()?)
            .await
            .map_err(|e| anyhow!("Failed to exchange authorization code: {}", e))?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| anyhow!("Server did not return an ID token"))?;
        let nonce = Nonce::new(stored_state.nonce.clone());
        let claims: &CoreIdTokenClaims = id_token
            .claims(&client.id_token_verifier(), &nonce)
            .map_err(|e| anyhow!("Failed to verify ID token: {}", e))?;

        let identity = IdentityClaim {
            subject: claims.subject().to_string(),
            email: claims.email().map(|e| e.to_string()),
            preferred_username: claims.preferred_username().map(|u| u.as_str().to_string()),
        };
        debug!("Authenticated subject {}", identity.subject);
        Ok(identity)
    }
}

/// Pending login states keyed by CSRF token.
pub struct AuthStateStore {
    states: RwLock<HashMap<String, AuthState>>,
}

impl AuthStateStore {
    pub fn new() -> Self {
        Self {
            states: RwLock::new(HashMap::new()),
        }
    }

    pub async fn store(&self, state: AuthState) {
        let key = state.csrf_token.clone();
        self.states.write().await.insert(key, state);
    }

    /// Removes and returns the state; each state can be used once.
    pub async fn take(&self, csrf_token: &str) -> Option<AuthState> {
        self.states.write().await.remove(csrf_token)
    }

    pub async fn cleanup_expired(&self) {
        let now = chrono::Utc::now().timestamp();
        self.states
            .write()
            .await
            .retain(|_, state| !state.is_expired(now));
    }
}

impl Default for AuthStateStore {
    fn default() -> Self {
        Self::new()
    }
}
