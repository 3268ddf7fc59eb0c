//! Listing page data and file downloads, both driven by the filter query.

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::error;

use super::api_error::{ApiError, ApiResult};
use super::session::AuthenticatedUser;
use super::state::{GuardedCatalog, ServerState};
use crate::export::{export, ExportFormat};

#[derive(Deserialize, Debug, Default)]
struct ListingQuery {
    #[serde(default)]
    query: String,
    #[serde(default)]
    attribute: String,
}

async fn get_data(
    State(catalog): State<GuardedCatalog>,
    Query(params): Query<ListingQuery>,
) -> ApiResult {
    let spots = catalog.search(&params.query, &params.attribute)?;
    Ok(Json(spots).into_response())
}

fn download(catalog: &GuardedCatalog, params: &ListingQuery, format: ExportFormat) -> ApiResult {
    let spots = catalog.search(&params.query, &params.attribute)?;
    let file = export(&spots, format).map_err(|e| {
        error!("Failed to export {} spots as {:?}: {:#}", spots.len(), format, e);
        ApiError::StorageUnavailable
    })?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}

async fn download_json(
    _user: AuthenticatedUser,
    State(catalog): State<GuardedCatalog>,
    Query(params): Query<ListingQuery>,
) -> ApiResult {
    download(&catalog, &params, ExportFormat::Json)
}

async fn download_csv(
    _user: AuthenticatedUser,
    State(catalog): State<GuardedCatalog>,
    Query(params): Query<ListingQuery>,
) -> ApiResult {
    download(&catalog, &params, ExportFormat::Csv)
}

pub fn make_data_routes(state: ServerState) -> Router {
    Router::new()
        .route("/data", get(get_data))
        .route("/download/json", get(download_json))
        .route("/download/csv", get(download_csv))
        .with_state(state)
}
