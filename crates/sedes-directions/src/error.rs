use std::time::Duration;

use sedes_core::TravelMode;
use thiserror::Error;

/// A failed directions request for a single travel mode.
///
/// The aggregator logs and absorbs these; they never fail an aggregation.
#[derive(Debug, Error)]
pub enum DirectionsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status.
    #[error("directions provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The provider answered but offered no route candidates.
    #[error("no {mode} route between the requested points")]
    NoRoute { mode: TravelMode },

    #[error("{mode} directions request timed out after {}ms", .after.as_millis())]
    Timeout { mode: TravelMode, after: Duration },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid directions base URL: {0}")]
    InvalidBaseUrl(String),

    /// No access token is configured, so no request can be authorised.
    #[error("directions access token is not configured")]
    MissingToken,
}

/// Failure of the aggregation mechanism itself, as opposed to a single mode.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AggregationError {
    /// The provider cannot serve any request (for example, no credentials).
    #[error("routing unavailable: {0}")]
    Unavailable(String),

    #[error("invalid {role} point ({latitude}, {longitude})")]
    InvalidEndpoint {
        role: &'static str,
        latitude: f64,
        longitude: f64,
    },
}
