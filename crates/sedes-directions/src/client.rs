//! HTTP client for the Mapbox Directions v5 API.
//!
//! One request per travel mode. Durations are converted from seconds to
//! minutes and distances from metres to kilometres before leaving this module.

use std::time::Duration;

use reqwest::{Client, Url};
use sedes_core::{AppConfig, GeoPoint, Route, TravelMode};

use crate::error::DirectionsError;
use crate::provider::DirectionsProvider;
use crate::types::{DirectionsResponse, ErrorBody};

const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/";
const DEFAULT_USER_AGENT: &str = "sedes/0.1 (facility-finder)";

/// Client for the Mapbox Directions API.
///
/// Use [`MapboxDirectionsClient::new`] for production or
/// [`MapboxDirectionsClient::with_base_url`] to point at a mock server in
/// tests. A client without a token can be constructed; it fails
/// [`DirectionsProvider::preflight`].
#[derive(Debug, Clone)]
pub struct MapboxDirectionsClient {
    client: Client,
    token: Option<String>,
    base_url: Url,
}

impl MapboxDirectionsClient {
    /// Creates a new client pointed at the production Mapbox API.
    ///
    /// # Errors
    ///
    /// Returns [`DirectionsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(token: Option<String>, timeout_secs: u64) -> Result<Self, DirectionsError> {
        Self::with_base_url(token, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DirectionsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`DirectionsError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        token: Option<String>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, DirectionsError> {
        Self::build(token, timeout_secs, base_url, DEFAULT_USER_AGENT)
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`MapboxDirectionsClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, DirectionsError> {
        Self::build(
            config.mapbox_token.clone(),
            config.directions_timeout_secs,
            &config.mapbox_base_url,
            &config.user_agent,
        )
    }

    fn build(
        token: Option<String>,
        timeout_secs: u64,
        base_url: &str,
        user_agent: &str,
    ) -> Result<Self, DirectionsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so relative joins append to the path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| DirectionsError::InvalidBaseUrl(format!("'{base_url}': {e}")))?;

        Ok(Self {
            client,
            token: token.filter(|t| !t.trim().is_empty()),
            base_url,
        })
    }

    /// Builds the request URL for one mode:
    /// `{base}directions/v5/{profile}/{lng},{lat};{lng},{lat}?…`.
    fn build_url(
        &self,
        mode: TravelMode,
        origin: &GeoPoint,
        destination: &GeoPoint,
        token: &str,
    ) -> Result<Url, DirectionsError> {
        let path = format!(
            "directions/v5/{}/{};{}",
            mode.mapbox_profile(),
            origin.lng_lat(),
            destination.lng_lat()
        );
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| DirectionsError::InvalidBaseUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("geometries", "geojson")
            .append_pair("overview", "full")
            .append_pair("steps", "false")
            .append_pair("access_token", token);
        Ok(url)
    }

    async fn fetch(
        &self,
        mode: TravelMode,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<Vec<Route>, DirectionsError> {
        let token = self.token.as_deref().ok_or(DirectionsError::MissingToken)?;
        let url = self.build_url(mode, origin, destination, token)?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(DirectionsError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| DirectionsError::Deserialize {
                context: format!("directions({mode})"),
                source: e,
            })?;

        if parsed.routes.is_empty() {
            tracing::debug!(
                mode = %mode,
                code = parsed.code.as_deref().unwrap_or("unknown"),
                message = parsed.message.as_deref().unwrap_or(""),
                "directions provider returned no routes"
            );
        }

        Ok(parsed
            .routes
            .into_iter()
            .map(|r| Route {
                mode,
                duration_minutes: r.duration / 60.0,
                distance_km: r.distance / 1000.0,
                geometry: r.geometry.map(|g| g.coordinates).unwrap_or_default(),
            })
            .collect())
    }
}

impl DirectionsProvider for MapboxDirectionsClient {
    async fn directions(
        &self,
        mode: TravelMode,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<Vec<Route>, DirectionsError> {
        self.fetch(mode, origin, destination).await
    }

    fn preflight(&self) -> Result<(), DirectionsError> {
        if self.token.is_some() {
            Ok(())
        } else {
            Err(DirectionsError::MissingToken)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> MapboxDirectionsClient {
        MapboxDirectionsClient::with_base_url(Some("pk.test".to_string()), 30, base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_uses_profile_and_lng_lat_pairs() {
        let client = test_client("https://api.mapbox.com");
        let url = client
            .build_url(
                TravelMode::Driving,
                &GeoPoint::new(19.43, -99.133),
                &GeoPoint::new(19.4, -99.15),
                "pk.test",
            )
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.mapbox.com/directions/v5/mapbox/driving/-99.133,19.43;-99.15,19.4?geometries=geojson&overview=full&steps=false&access_token=pk.test"
        );
    }

    #[test]
    fn build_url_strips_trailing_slash() {
        let client = test_client("https://api.mapbox.com///");
        let url = client
            .build_url(
                TravelMode::Cycling,
                &GeoPoint::new(1.0, 2.0),
                &GeoPoint::new(3.0, 4.0),
                "pk.test",
            )
            .expect("url");
        assert!(url
            .as_str()
            .starts_with("https://api.mapbox.com/directions/v5/mapbox/cycling/2,1;4,3?"));
    }

    #[test]
    fn build_url_keeps_base_path_prefix() {
        let client = test_client("http://localhost:9000/proxy");
        let url = client
            .build_url(
                TravelMode::Walking,
                &GeoPoint::new(1.0, 2.0),
                &GeoPoint::new(3.0, 4.0),
                "pk.test",
            )
            .expect("url");
        assert!(url
            .as_str()
            .starts_with("http://localhost:9000/proxy/directions/v5/mapbox/walking/"));
    }

    #[test]
    fn preflight_fails_without_token() {
        let client = MapboxDirectionsClient::with_base_url(None, 30, "https://api.mapbox.com")
            .expect("client");
        assert!(matches!(
            client.preflight(),
            Err(DirectionsError::MissingToken)
        ));

        let blank = MapboxDirectionsClient::with_base_url(
            Some("  ".to_string()),
            30,
            "https://api.mapbox.com",
        )
        .expect("client");
        assert!(blank.preflight().is_err());
        assert!(test_client("https://api.mapbox.com").preflight().is_ok());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = MapboxDirectionsClient::with_base_url(None, 30, "not a url");
        assert!(matches!(result, Err(DirectionsError::InvalidBaseUrl(_))));
    }
}
