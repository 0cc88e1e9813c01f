//! Travel modes, routes, and the per-mode route set.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::GeoPoint;

/// A computed travel mode. Transit is served as a deep link instead
/// (see [`transit_url`]).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [
        TravelMode::Driving,
        TravelMode::Walking,
        TravelMode::Cycling,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
        }
    }

    /// Mapbox Directions routing profile for this mode.
    #[must_use]
    pub fn mapbox_profile(self) -> &'static str {
        match self {
            TravelMode::Driving => "mapbox/driving",
            TravelMode::Walking => "mapbox/walking",
            TravelMode::Cycling => "mapbox/cycling",
        }
    }

    /// Parses a comma-separated mode list such as `"walking, cycling"`.
    /// A blank list means every mode; empty items are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTravelMode`] for the first unknown name.
    pub fn parse_list(raw: &str) -> Result<Vec<TravelMode>, CoreError> {
        if raw.trim().is_empty() {
            return Ok(Self::ALL.to_vec());
        }
        raw.split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" | "mapbox/driving" => Ok(TravelMode::Driving),
            "walking" | "mapbox/walking" => Ok(TravelMode::Walking),
            "cycling" | "mapbox/cycling" => Ok(TravelMode::Cycling),
            other => Err(CoreError::InvalidTravelMode(other.to_string())),
        }
    }
}

/// One resolved route for one travel mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub mode: TravelMode,
    pub duration_minutes: f64,
    pub distance_km: f64,
    /// Path as `[longitude, latitude]` pairs, GeoJSON order.
    pub geometry: Vec<[f64; 2]>,
}

/// Resolved routes for one origin/destination pair, keyed by mode.
///
/// A mode missing from the set means the route is unavailable for this pair.
/// Iteration always follows mode order, never the order in which routes were
/// inserted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteSet {
    routes: BTreeMap<TravelMode, Route>,
}

impl RouteSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `route` under its own mode, replacing any previous entry.
    pub fn insert(&mut self, route: Route) {
        self.routes.insert(route.mode, route);
    }

    #[must_use]
    pub fn get(&self, mode: TravelMode) -> Option<&Route> {
        self.routes.get(&mode)
    }

    #[must_use]
    pub fn contains(&self, mode: TravelMode) -> bool {
        self.routes.contains_key(&mode)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn modes(&self) -> impl Iterator<Item = TravelMode> + '_ {
        self.routes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }
}

impl FromIterator<Route> for RouteSet {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        let mut set = RouteSet::new();
        for route in iter {
            set.insert(route);
        }
        set
    }
}

/// Google Maps deep link for public-transit directions between two points.
#[must_use]
pub fn transit_url(origin: &GeoPoint, destination: &GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={}&destination={}&travelmode=transit",
        origin.lat_lng(),
        destination.lat_lng()
    )
}
