use axum::{routing::get, Router};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::feed::{refresh_once, FeedClient, FeedError, Refresher};
use crate::geocode::{DisabledGeocoder, GeocodeError, NominatimGeocoder, ReverseGeocoder};
use crate::store::{FileStore, MemoryStore, RecordStore, RetryPolicy, StoreError};

use super::api::epochs as epoch_handlers;
use super::api::health as health_handlers;
use super::api::now as now_handlers;
use super::api_doc::ApiDoc;
use super::config::{Config, FeedConfig, GeocoderConfig, StoreBackend, StoreConfig};
use super::state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),
    #[error("Geocoder error: {0}")]
    Geocode(#[from] GeocodeError),
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/epochs", get(epoch_handlers::list_epochs))
        .route("/epochs/{epoch}", get(epoch_handlers::get_epoch))
        .route("/epochs/{epoch}/speed", get(epoch_handlers::get_epoch_speed))
        .route(
            "/epochs/{epoch}/location",
            get(epoch_handlers::get_epoch_location),
        )
        .route("/now", get(now_handlers::get_now))
        .route("/health", get(health_handlers::health))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the configured store, retrying under the configured policy.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::File => {
            let policy = RetryPolicy::new(config.connect_attempts, config.connect_backoff);
            let store = policy
                .run("Opening record store", || FileStore::open(config.path.clone()))
                .await?;
            log::info!("Using file store at {}", store.path().display());
            Ok(Arc::new(store))
        }
    }
}

pub fn build_geocoder(config: &GeocoderConfig) -> Result<Arc<dyn ReverseGeocoder>, GeocodeError> {
    if !config.enabled {
        log::info!("Reverse geocoding disabled");
        return Ok(Arc::new(DisabledGeocoder));
    }

    let geocoder = NominatimGeocoder::new(config.url.clone(), &config.user_agent, config.timeout)?
        .with_zoom(config.zoom)
        .with_language(config.language.clone());
    Ok(Arc::new(geocoder))
}

/// Refreshes before taking requests, replacing any restored snapshot.
/// A failed fetch leaves the store as it was.
async fn refresh_on_start(config: &FeedConfig, feed: &FeedClient, store: &dyn RecordStore) {
    if !config.fetch_on_start {
        return;
    }
    match refresh_once(feed, store).await {
        Ok(count) => log::info!("Loaded {} state vectors", count),
        Err(e) => log::warn!("Initial feed fetch failed: {}", e),
    }
}

pub async fn run_server(config: Config) -> Result<(), ServerError> {
    let bind_addr = config.web.bind.clone();

    let store = open_store(&config.store).await?;
    let feed = Arc::new(FeedClient::new(config.feed.url.clone(), config.feed.timeout)?);

    refresh_on_start(&config.feed, &feed, store.as_ref()).await;

    let refresher = Refresher::spawn(feed, store.clone(), config.feed.refresh_interval);

    let state = AppState {
        store,
        geocoder: build_geocoder(&config.geocoder)?,
    };
    let app = build_router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    refresher.stop().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
