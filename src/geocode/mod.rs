mod nominatim;

use async_trait::async_trait;
use thiserror::Error;

pub use nominatim::NominatimGeocoder;

/// Placeholder returned whenever a position cannot be resolved.
pub const UNKNOWN_LOCATION: &str = "Unknown location";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Geocoder returned status {0}")]
    Status(u16),
}

/// Resolves a latitude/longitude pair to a human-readable place.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// `Ok(None)` means the provider answered but knows no place there,
    /// e.g. over open ocean.
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeocodeError>;
}

/// Geocoder that never resolves anything.
pub struct DisabledGeocoder;

#[async_trait]
impl ReverseGeocoder for DisabledGeocoder {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> Result<Option<String>, GeocodeError> {
        Ok(None)
    }
}

/// Resolve a position, falling back to [`UNKNOWN_LOCATION`] on a miss or a
/// provider failure.
pub async fn describe_location(geocoder: &dyn ReverseGeocoder, latitude: f64, longitude: f64) -> String {
    match geocoder.reverse(latitude, longitude).await {
        Ok(Some(address)) => address,
        Ok(None) => UNKNOWN_LOCATION.to_string(),
        Err(e) => {
            log::warn!(
                "Reverse geocoding failed for ({}, {}): {}",
                latitude,
                longitude,
                e
            );
            UNKNOWN_LOCATION.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl ReverseGeocoder for Failing {
        async fn reverse(&self, _: f64, _: f64) -> Result<Option<String>, GeocodeError> {
            Err(GeocodeError::Status(503))
        }
    }

    struct Fixed(&'static str);

    #[async_trait]
    impl ReverseGeocoder for Fixed {
        async fn reverse(&self, _: f64, _: f64) -> Result<Option<String>, GeocodeError> {
            Ok(Some(self.0.to_string()))
        }
    }

    #[tokio::test]
    async fn test_disabled_is_unknown() {
        assert_eq!(
            describe_location(&DisabledGeocoder, 29.5, -95.1).await,
            UNKNOWN_LOCATION
        );
    }

    #[tokio::test]
    async fn test_failure_degrades_to_unknown() {
        assert_eq!(describe_location(&Failing, 0.0, 0.0).await, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn test_address_is_passed_through() {
        assert_eq!(
            describe_location(&Fixed("Houston, Texas"), 29.7, -95.3).await,
            "Houston, Texas"
        );
    }
}
