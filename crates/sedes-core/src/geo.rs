//! Geographic points.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees with an optional human-readable label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            label: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns `true` when both components are finite and within
    /// `[-90, 90]` / `[-180, 180]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `"lng,lat"` as expected by Mapbox path segments.
    #[must_use]
    pub fn lng_lat(&self) -> String {
        format!("{},{}", self.longitude, self.latitude)
    }

    /// `"lat,lng"` as expected by Google Maps query parameters.
    #[must_use]
    pub fn lat_lng(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}
