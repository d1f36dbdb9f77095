use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ephemeris::{convert, speed, StateVector};
use crate::geocode::describe_location;
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse, EPOCH_NOT_FOUND};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListEpochsQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EpochEntry {
    pub epoch: String,
    pub state_vector: StateVector,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpeedResponse {
    /// km/s
    pub speed: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationResponse {
    pub lat: f64,
    pub lon: f64,
    /// km above the WGS-84 ellipsoid
    pub alt: f64,
    pub geoloc: String,
    pub epoch_timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now_timestamp: Option<String>,
}

#[utoipa::path(
    get,
    path = "/epochs",
    tag = "epochs",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum number of entries"),
        ("offset" = Option<usize>, Query, description = "Entries to skip")
    ),
    responses(
        (status = 200, description = "State vectors in store order", body = Vec<EpochEntry>),
        (status = 400, description = "Invalid query parameters")
    )
)]
pub async fn list_epochs(
    State(state): State<AppState>,
    Query(query): Query<ListEpochsQuery>,
) -> ApiResult<Json<Vec<EpochEntry>>> {
    let entries = state.store.list_range(query.offset, query.limit)?;
    Ok(Json(
        entries
            .into_iter()
            .map(|(epoch, state_vector)| EpochEntry {
                epoch,
                state_vector,
            })
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/epochs/{epoch}",
    tag = "epochs",
    params(
        ("epoch" = String, Path, description = "Epoch, e.g. 2024-001T12:00:00.000Z")
    ),
    responses(
        (status = 200, description = "Stored state vector", body = StateVector),
        (status = 404, description = "Epoch not found", body = ErrorResponse)
    )
)]
pub async fn get_epoch(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<StateVector>> {
    Ok(Json(load_record(&state, &epoch)?))
}

#[utoipa::path(
    get,
    path = "/epochs/{epoch}/speed",
    tag = "epochs",
    params(
        ("epoch" = String, Path, description = "Epoch, e.g. 2024-001T12:00:00.000Z")
    ),
    responses(
        (status = 200, description = "Speed in km/s", body = SpeedResponse),
        (status = 400, description = "Stored vector is malformed", body = ErrorResponse),
        (status = 404, description = "Epoch not found", body = ErrorResponse)
    )
)]
pub async fn get_epoch_speed(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<SpeedResponse>> {
    let record = load_record(&state, &epoch)?;
    let speed = speed(record.velocity()?)?;
    Ok(Json(SpeedResponse { speed }))
}

#[utoipa::path(
    get,
    path = "/epochs/{epoch}/location",
    tag = "epochs",
    params(
        ("epoch" = String, Path, description = "Epoch, e.g. 2024-001T12:00:00.000Z")
    ),
    responses(
        (status = 200, description = "Ground position", body = LocationResponse),
        (status = 400, description = "Stored vector is malformed", body = ErrorResponse),
        (status = 404, description = "Epoch not found", body = ErrorResponse)
    )
)]
pub async fn get_epoch_location(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<LocationResponse>> {
    let record = load_record(&state, &epoch)?;
    Ok(Json(locate_record(&state, &record).await?))
}

fn load_record(state: &AppState, epoch: &str) -> ApiResult<StateVector> {
    if !state.store.exists(epoch)? {
        return Err(ApiError::NotFound(EPOCH_NOT_FOUND));
    }
    // The record can vanish between the two calls during a refresh.
    state
        .store
        .get(epoch)?
        .ok_or(ApiError::NotFound(EPOCH_NOT_FOUND))
}

pub(super) async fn locate_record(
    state: &AppState,
    record: &StateVector,
) -> ApiResult<LocationResponse> {
    let geodetic = convert(record.position()?, &record.epoch)?;
    let geoloc = describe_location(
        state.geocoder.as_ref(),
        geodetic.latitude_deg,
        geodetic.longitude_deg,
    )
    .await;

    Ok(LocationResponse {
        lat: geodetic.latitude_deg,
        lon: geodetic.longitude_deg,
        alt: geodetic.altitude_km,
        geoloc,
        epoch_timestamp: record.epoch.clone(),
        now_timestamp: None,
    })
}
