use std::time::Duration;

use crate::ephemeris::StateVector;

use super::error::FeedError;
use super::oem::parse_oem;

/// HTTP client for the published OEM ephemeris.
pub struct FeedClient {
    url: String,
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<Vec<StateVector>, FeedError> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FeedError::Empty);
        }

        let records = parse_oem(&body);
        if records.is_empty() {
            return Err(FeedError::NoRecords);
        }

        log::info!("Fetched {} state vectors from {}", records.len(), self.url);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::oem::tests::SAMPLE_OEM;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> FeedClient {
        FeedClient::new(
            format!("{}/ISS.OEM_J2K_EPH.txt", server.uri()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_feed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ISS.OEM_J2K_EPH.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_OEM))
            .mount(&server)
            .await;

        let records = client_for(&server).await.fetch().await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].epoch, "2024-001T12:00:00.000Z");
    }

    #[tokio::test]
    async fn test_fetch_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Status(503)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  \n"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Empty));
    }

    #[tokio::test]
    async fn test_fetch_rejects_feed_without_vectors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("CCSDS_OEM_VERS = 2.0\n"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::NoRecords));
    }
}
