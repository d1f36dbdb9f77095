use utoipa::OpenApi;

use super::api::epochs::{EpochEntry, ListEpochsQuery, LocationResponse, SpeedResponse};
use super::api::error::ErrorResponse;
use super::api::health::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::epochs::list_epochs,
        super::api::epochs::get_epoch,
        super::api::epochs::get_epoch_speed,
        super::api::epochs::get_epoch_location,
        super::api::now::get_now,
        super::api::health::health,
    ),
    components(
        schemas(
            EpochEntry,
            ListEpochsQuery,
            LocationResponse,
            SpeedResponse,
            HealthResponse,
            ErrorResponse,
            crate::ephemeris::StateVector,
            crate::ephemeris::Component,
        )
    ),
    info(
        title = "Orbit Tracker API",
        description = "State vectors and ground position of the tracked spacecraft",
        version = "0.1.0"
    ),
    tags(
        (name = "epochs", description = "Ephemeris state vectors"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;
