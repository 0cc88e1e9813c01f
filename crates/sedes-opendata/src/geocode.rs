//! Forward geocoding through the Mapbox Geocoding v6 API, restricted to the
//! service area.

use std::time::Duration;

use reqwest::{Client, Url};
use sedes_core::config::DEFAULT_GEOCODE_BBOX;
use sedes_core::{AppConfig, GeoPoint};

use crate::error::SourceError;
use crate::types::GeocodeResponse;

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";
const DEFAULT_USER_AGENT: &str = "sedes/0.1 (facility-finder)";

#[derive(Debug, Clone)]
pub struct MapboxGeocoder {
    client: Client,
    token: Option<String>,
    base_url: Url,
    bbox: String,
    country: String,
    language: String,
    limit: u32,
}

impl MapboxGeocoder {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(token: Option<String>, timeout_secs: u64) -> Result<Self, SourceError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a geocoder with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built, or
    /// [`SourceError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        token: Option<String>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SourceError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            token: token.filter(|t| !t.trim().is_empty()),
            base_url,
            bbox: DEFAULT_GEOCODE_BBOX.to_string(),
            country: "MX".to_string(),
            language: "es".to_string(),
            limit: 5,
        })
    }

    /// # Errors
    ///
    /// Same as [`MapboxGeocoder::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let mut geocoder = Self::with_base_url(
            config.mapbox_token.clone(),
            config.directions_timeout_secs,
            &config.mapbox_base_url,
        )?;
        geocoder.bbox.clone_from(&config.geocode_bbox);
        geocoder.country.clone_from(&config.geocode_country);
        geocoder.language.clone_from(&config.geocode_language);
        geocoder.limit = config.geocode_limit;
        Ok(geocoder)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Resolves free text to candidate points, best match first. Each point
    /// is labelled with the matched address.
    ///
    /// # Errors
    ///
    /// - [`SourceError::EmptyQuery`] if `query` is blank.
    /// - [`SourceError::MissingToken`] if no access token is configured.
    /// - [`SourceError::Http`] / [`SourceError::UnexpectedStatus`] on
    ///   transport or HTTP failure.
    /// - [`SourceError::Deserialize`] if the body is not a feature collection.
    pub async fn forward(&self, query: &str) -> Result<Vec<GeoPoint>, SourceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SourceError::EmptyQuery);
        }
        let token = self.token.as_deref().ok_or(SourceError::MissingToken)?;
        let url = self.build_url(query, token)?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                context: "geocode/v6/forward".to_string(),
            });
        }
        let body = response.text().await?;
        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
                context: format!("geocode(q={query})"),
                source: e,
            })?;

        let points: Vec<GeoPoint> = parsed
            .features
            .into_iter()
            .filter_map(|feature| {
                let coordinates = feature.geometry?.coordinates;
                let (&lng, &lat) = (coordinates.first()?, coordinates.get(1)?);
                let point = GeoPoint::new(lat, lng);
                if !point.is_valid() {
                    return None;
                }
                let label = feature
                    .properties
                    .and_then(|p| p.full_address.or(p.name))
                    .filter(|l| !l.trim().is_empty());
                Some(match label {
                    Some(label) => point.with_label(label),
                    None => point,
                })
            })
            .collect();

        tracing::debug!(query, candidates = points.len(), "geocoded query");
        Ok(points)
    }

    fn build_url(&self, query: &str, token: &str) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join("search/geocode/v6/forward")
            .map_err(|e| SourceError::InvalidBaseUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("access_token", token)
            .append_pair("bbox", &self.bbox)
            .append_pair("country", &self.country)
            .append_pair("language", &self.language)
            .append_pair("limit", &self.limit.to_string());
        Ok(url)
    }
}
