use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{GeocodeError, ReverseGeocoder};

const DEFAULT_ZOOM: u8 = 15;
const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
    error: Option<String>,
}

/// Reverse geocoding against a Nominatim instance.
pub struct NominatimGeocoder {
    base_url: String,
    zoom: u8,
    language: String,
    http: reqwest::Client,
}

impl NominatimGeocoder {
    /// Nominatim's usage policy requires an identifying `User-Agent`.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            zoom: DEFAULT_ZOOM,
            language: DEFAULT_LANGUAGE.to_string(),
            http,
        })
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GeocodeError> {
        let url = format!("{}/reverse", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", self.zoom.to_string()),
                ("accept-language", self.language.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body: ReverseResponse = response.json().await?;
        if let Some(reason) = body.error {
            log::debug!("No place at ({}, {}): {}", latitude, longitude, reason);
            return Ok(None);
        }

        Ok(body.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder_for(server: &MockServer) -> NominatimGeocoder {
        NominatimGeocoder::new(server.uri(), "iss_tracker", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_reverse_returns_display_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "jsonv2"))
            .and(query_param("lat", "29.76"))
            .and(query_param("lon", "-95.37"))
            .and(query_param("zoom", "15"))
            .and(query_param("accept-language", "en"))
            .and(header("user-agent", "iss_tracker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "place_id": 1,
                "display_name": "Houston, Harris County, Texas, United States"
            })))
            .mount(&server)
            .await;

        let place = geocoder_for(&server).reverse(29.76, -95.37).await.unwrap();
        assert_eq!(
            place.as_deref(),
            Some("Houston, Harris County, Texas, United States")
        );
    }

    #[tokio::test]
    async fn test_open_ocean_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"error": "Unable to geocode"})),
            )
            .mount(&server)
            .await;

        assert_eq!(geocoder_for(&server).reverse(-40.0, -140.0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zoom_and_language_are_configurable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("zoom", "10"))
            .and(query_param("accept-language", "de"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "display_name": "Berlin, Deutschland"
            })))
            .mount(&server)
            .await;

        let geocoder = geocoder_for(&server).with_zoom(10).with_language("de");
        assert_eq!(
            geocoder.reverse(52.5, 13.4).await.unwrap().as_deref(),
            Some("Berlin, Deutschland")
        );
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = geocoder_for(&server).reverse(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Status(429)));
    }
}
