use sedes_core::{GeoPoint, RankedFacility, Route, RouteSet, TravelMode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Ranking,
    FacilitySelected,
    RoutesPending,
    RoutesReady,
}

/// Non-error conditions the presentation layer should surface to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Notice {
    /// The location ranked no facility with usable coordinates.
    NoResults,
    /// Routing could not run at all for the current selection.
    RoutesUnavailable(String),
}

/// Read-only snapshot of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    pub query: Option<GeoPoint>,
    pub ranked_facilities: Vec<RankedFacility>,
    pub selected_facility: Option<RankedFacility>,
    pub route_set: RouteSet,
    pub active_mode: TravelMode,
    /// Route for `active_mode`, `None` when that mode is unavailable.
    pub active_route: Option<Route>,
    pub is_aggregating: bool,
    pub notice: Option<Notice>,
    /// Public-transit deep link for the selected pair.
    pub transit_url: Option<String>,
}
