//! `/api/v1/spots` CRUD and derived listings.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::api_error::{created, ok, ApiError, ApiResult};
use super::session::AuthenticatedUser;
use super::state::{GuardedCatalog, ServerState};
use crate::catalog::DEFAULT_MOST_VIEWED_LIMIT;
use crate::video_store::{NewVideoRecord, VideoRecordPatch};

#[derive(Deserialize, Debug)]
struct MostViewedQuery {
    limit: Option<String>,
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(format!("Invalid body: {}", e)))
}

fn parse_limit(raw: Option<&str>) -> Result<usize, ApiError> {
    match raw {
        None => Ok(DEFAULT_MOST_VIEWED_LIMIT),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(limit) if limit > 0 => Ok(limit),
            _ => Err(ApiError::BadRequest(format!(
                "limit must be a positive integer, got '{}'",
                raw
            ))),
        },
    }
}

async fn list_spots(State(catalog): State<GuardedCatalog>) -> ApiResult {
    let spots = catalog.list()?;
    Ok(ok(format!("Fetched {} spots", spots.len()), spots))
}

async fn get_spot(State(catalog): State<GuardedCatalog>, Path(id): Path<String>) -> ApiResult {
    let spot = catalog.get(&id)?;
    Ok(ok("Fetched spot", spot))
}

async fn post_spot(
    user: AuthenticatedUser,
    State(catalog): State<GuardedCatalog>,
    body: Bytes,
) -> ApiResult {
    let new: NewVideoRecord = parse_body(&body)?;
    let spot = catalog.create(new)?;
    debug!("Spot {} created by {:?}", spot.id, user.identity);
    Ok(created("Spot created", spot))
}

async fn put_spot(
    user: AuthenticatedUser,
    State(catalog): State<GuardedCatalog>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult {
    let patch: VideoRecordPatch = parse_body(&body)?;
    let spot = catalog.update(&id, patch)?;
    debug!("Spot {} updated by {:?}", spot.id, user.identity);
    Ok(ok("Spot updated", spot))
}

async fn delete_spot(
    user: AuthenticatedUser,
    State(catalog): State<GuardedCatalog>,
    Path(id): Path<String>,
) -> ApiResult {
    let spot = catalog.delete(&id)?;
    debug!("Spot {} deleted by {:?}", spot.id, user.identity);
    Ok(ok("Spot deleted", spot))
}

async fn get_by_genre(
    State(catalog): State<GuardedCatalog>,
    Path(genre): Path<String>,
) -> ApiResult {
    let spots = catalog.by_genre(&genre)?;
    Ok(ok(
        format!("Fetched {} spots with genre '{}'", spots.len(), genre),
        spots,
    ))
}

async fn get_by_label(
    State(catalog): State<GuardedCatalog>,
    Path(label): Path<String>,
) -> ApiResult {
    let spots = catalog.by_label(&label)?;
    Ok(ok(
        format!("Fetched {} spots with label '{}'", spots.len(), label),
        spots,
    ))
}

async fn get_most_viewed(
    State(catalog): State<GuardedCatalog>,
    Query(query): Query<MostViewedQuery>,
) -> ApiResult {
    let limit = parse_limit(query.limit.as_deref())?;
    let spots = catalog.most_viewed(limit)?;
    Ok(ok(format!("Fetched top {} spots by views", spots.len()), spots))
}

pub fn make_spots_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(list_spots).post(post_spot))
        .route("/most-viewed", get(get_most_viewed))
        .route("/by-genre/{genre}", get(get_by_genre))
        .route("/by-label/{label}", get(get_by_label))
        .route("/{id}", get(get_spot).put(put_spot).delete(delete_spot))
        .with_state(state)
}
