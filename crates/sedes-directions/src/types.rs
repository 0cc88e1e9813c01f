//! Mapbox Directions v5 response types.

use serde::Deserialize;

/// Top-level Directions response.
///
/// `code` is `"Ok"` on success; `"NoRoute"`, `"NoSegment"` and friends come
/// back with an empty `routes` array.
#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    /// Seconds.
    pub duration: f64,
    /// Metres.
    pub distance: f64,
    #[serde(default)]
    pub geometry: Option<LineString>,
}

/// GeoJSON `LineString` geometry (`geometries=geojson`).
#[derive(Debug, Deserialize)]
pub struct LineString {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
