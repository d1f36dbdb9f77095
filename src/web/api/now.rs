use axum::{extract::State, Json};
use chrono::{DateTime, Utc};

use crate::ephemeris::{find_nearest, StateVector};
use crate::web::api::epochs::{locate_record, LocationResponse};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse, NO_DATA};
use crate::web::state::AppState;

const NOW_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

#[utoipa::path(
    get,
    path = "/now",
    tag = "epochs",
    responses(
        (status = 200, description = "Ground position of the state vector closest to now", body = LocationResponse),
        (status = 400, description = "Stored vector is malformed", body = ErrorResponse),
        (status = 404, description = "No data available", body = ErrorResponse)
    )
)]
pub async fn get_now(State(state): State<AppState>) -> ApiResult<Json<LocationResponse>> {
    let now = Utc::now();

    let candidates = state.store.list_range(0, None)?;
    let record = nearest_record(now, candidates).ok_or(ApiError::NotFound(NO_DATA))?;

    let mut response = locate_record(&state, &record).await?;
    response.now_timestamp = Some(now.format(NOW_FORMAT).to_string());
    Ok(Json(response))
}

/// Record closest to `now`. An exact tie resolves to the earliest epoch,
/// whatever order the store enumerates in.
fn nearest_record(
    now: DateTime<Utc>,
    mut candidates: Vec<(String, StateVector)>,
) -> Option<StateVector> {
    candidates.sort_by(|a, b| a.0.cmp(&b.0));
    find_nearest(now, candidates).map(|(_, record)| record)
}
