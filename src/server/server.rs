use anyhow::{Context, Result};
use std::{sync::Arc, time::Duration};

use tracing::{error, info};

use crate::catalog::Catalog;
use crate::config::OidcConfig;
use crate::oidc::{OidcClient, SessionStore};
use tower_http::services::ServeDir;

use axum::{
    extract::State,
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::api_error::ApiError;
use super::auth_routes::make_auth_routes;
use super::data_routes::make_data_routes;
use super::session::AuthenticatedUser;
use super::spots_routes::make_spots_routes;
use super::{log_requests, state::*, ServerConfig};

const BUNDLED_API_DOCS: &str = include_str!("../../assets/openapi.json");

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: &'static str,
    pub backend: &'static str,
    pub spots_count: Option<usize>,
    pub require_login: bool,
    pub logged_in_as: Option<String>,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(user: Option<AuthenticatedUser>, State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION"),
        backend: state.catalog.backend_name(),
        // stats stay up even when storage is not
        spots_count: state.catalog.count().ok(),
        require_login: state.config.require_login,
        logged_in_as: user
            .and_then(|u| u.identity)
            .map(|identity| identity.preferred_username.unwrap_or(identity.subject)),
    };
    Json(stats)
}

async fn api_docs(State(config): State<ServerConfig>) -> Result<Response, ApiError> {
    let body = match &config.api_docs_path {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            error!("Failed to read API docs {:?}: {}", path, e);
            ApiError::NotFound("API description is not available".to_string())
        })?,
        None => BUNDLED_API_DOCS.to_string(),
    };
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

pub async fn make_app(
    config: ServerConfig,
    catalog: Arc<Catalog>,
    session_store: Arc<SessionStore>,
    oidc_config: Option<OidcConfig>,
) -> Result<Router> {
    let oidc_client = match oidc_config {
        Some(oidc_config) => Some(Arc::new(OidcClient::new(oidc_config).await?)),
        None => None,
    };
    let state = ServerState::new(config.clone(), catalog, session_store, oidc_client);

    let home_router: Router = match &config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let docs_routes: Router = Router::new()
        .route("/docs", get(api_docs))
        .with_state(state.clone());

    let app: Router = home_router
        .nest("/api/v1/spots", make_spots_routes(state.clone()))
        .nest("/api", make_data_routes(state.clone()).merge(docs_routes))
        .nest("/auth", make_auth_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    config: ServerConfig,
    catalog: Arc<Catalog>,
    oidc_config: Option<OidcConfig>,
) -> Result<()> {
    let address = format!("{}:{}", config.bind_address, config.port);
    let app = make_app(config, catalog, Arc::new(SessionStore::new()), oidc_config).await?;

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Listening on {}", address);

    Ok(axum::serve(listener, app).await?)
}
