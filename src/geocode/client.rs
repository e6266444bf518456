//! Geocoding provider client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::GeocodeResult;
use crate::config::GeocoderConfig;
use crate::error::{PlacesError, Result};

/// Address / place-id lookups consumed by the resolvers.
///
/// Both operations fail with [`PlacesError::NoResults`] when the provider has
/// nothing and with [`PlacesError::Transport`] on network or provider errors.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>>;

    async fn geocode_by_place_id(&self, place_id: &str) -> Result<Vec<GeocodeResult>>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

impl GeocodeResponse {
    fn into_results(self, query: &str) -> Result<Vec<GeocodeResult>> {
        match self.status.as_str() {
            "OK" if !self.results.is_empty() => Ok(self.results),
            "OK" | "ZERO_RESULTS" => Err(PlacesError::NoResults(query.to_string())),
            status => {
                let detail = self.error_message.unwrap_or_default();
                Err(PlacesError::Transport(format!("{} {}", status, detail).trim_end().to_string()))
            }
        }
    }
}

/// HTTP client for the Google Geocoding JSON API
pub struct GoogleGeocoder {
    client: Client,
    endpoint: Url,
    api_key: String,
    language: String,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| PlacesError::Transport(format!("invalid endpoint '{}': {}", config.endpoint, e)))?;
        let client = Client::builder()
            .user_agent("politicalplaces/0.1")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        if config.api_key.is_empty() {
            warn!("No geocoding API key configured; requests will likely be denied");
        }

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            language: config.language.clone(),
        })
    }

    fn request_url(&self, param: &str, value: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair(param, value)
            .append_pair("language", &self.language)
            .append_pair("key", &self.api_key);
        url
    }

    async fn fetch(&self, param: &str, value: &str) -> Result<Vec<GeocodeResult>> {
        debug!("Geocoding {}={}", param, value);

        let response = self
            .client
            .get(self.request_url(param, value))
            .send()
            .await?
            .error_for_status()?;

        let body: GeocodeResponse = response.json().await?;
        let results = body.into_results(value)?;

        debug!("Provider returned {} results for '{}'", results.len(), value);
        Ok(results)
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Vec<GeocodeResult>> {
        self.fetch("address", address).await
    }

    async fn geocode_by_place_id(&self, place_id: &str) -> Result<Vec<GeocodeResult>> {
        self.fetch("place_id", place_id).await
    }
}
