//! Synchronous session state machine.
//!
//! `Idle → Ranking → FacilitySelected → RoutesPending → RoutesReady`. Every
//! entry into `RoutesPending` hands out a [`RouteTicket`] stamped with a new
//! generation; only the ticket of the latest generation may complete.

use sedes_core::{
    nearest_k, transit_url, Facility, GeoPoint, RankedFacility, RouteSet, TravelMode,
};
use sedes_directions::AggregationError;

use crate::error::SessionError;
use crate::view::{Notice, Phase, SessionView};

/// Claim on one pending route aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTicket {
    generation: u64,
    origin: GeoPoint,
    destination: GeoPoint,
}

impl RouteTicket {
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn origin(&self) -> &GeoPoint {
        &self.origin
    }

    #[must_use]
    pub fn destination(&self) -> &GeoPoint {
        &self.destination
    }
}

#[derive(Debug, Clone)]
pub struct SessionState {
    facilities: Vec<Facility>,
    nearest_count: usize,
    phase: Phase,
    query: Option<GeoPoint>,
    ranked: Vec<RankedFacility>,
    selected: Option<RankedFacility>,
    routes: RouteSet,
    active_mode: TravelMode,
    is_aggregating: bool,
    notice: Option<Notice>,
    generation: u64,
}

impl SessionState {
    /// A fresh session over an immutable facility collection, ranking the
    /// `nearest_count` closest facilities per location.
    #[must_use]
    pub fn new(facilities: Vec<Facility>, nearest_count: usize) -> Self {
        Self {
            facilities,
            nearest_count,
            phase: Phase::Idle,
            query: None,
            ranked: Vec::new(),
            selected: None,
            routes: RouteSet::new(),
            active_mode: TravelMode::default(),
            is_aggregating: false,
            notice: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_aggregating(&self) -> bool {
        self.is_aggregating
    }

    /// Ranks facilities around `point` and selects the closest one.
    ///
    /// Returns the ticket for the selection's route aggregation, or `None`
    /// when nothing ranked; the session is then back in `Idle` with
    /// [`Notice::NoResults`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidLocation`] for an invalid point, leaving
    /// the state untouched.
    pub fn select_location(
        &mut self,
        point: GeoPoint,
    ) -> Result<Option<RouteTicket>, SessionError> {
        let invalid = || SessionError::InvalidLocation {
            latitude: point.latitude,
            longitude: point.longitude,
        };
        if !point.is_valid() {
            return Err(invalid());
        }

        let ranked =
            nearest_k(&self.facilities, &point, self.nearest_count).map_err(|_| invalid())?;

        // Any aggregation still in flight belongs to the previous location.
        self.phase = Phase::Ranking;
        self.generation += 1;
        self.query = Some(point);
        self.ranked = ranked;
        self.selected = None;
        self.routes = RouteSet::new();
        self.active_mode = TravelMode::default();
        self.is_aggregating = false;
        self.notice = None;

        let Some(first) = self.ranked.first().cloned() else {
            tracing::debug!("no facility ranked for location");
            self.phase = Phase::Idle;
            self.notice = Some(Notice::NoResults);
            return Ok(None);
        };

        Ok(self.begin_routes(first))
    }

    /// Switches the selection to another ranked candidate.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSelection`] if `id` is not among the
    /// ranked candidates, leaving the state untouched.
    pub fn select_facility(&mut self, id: i64) -> Result<RouteTicket, SessionError> {
        let candidate = self
            .ranked
            .iter()
            .find(|r| r.facility.id == id)
            .cloned()
            .ok_or(SessionError::InvalidSelection { id })?;

        self.begin_routes(candidate)
            .ok_or(SessionError::InvalidSelection { id })
    }

    fn begin_routes(&mut self, candidate: RankedFacility) -> Option<RouteTicket> {
        let origin = self.query.clone()?;
        let destination = candidate.facility.location()?;

        self.phase = Phase::FacilitySelected;
        self.selected = Some(candidate);
        self.generation += 1;
        self.routes = RouteSet::new();
        self.active_mode = TravelMode::default();
        self.notice = None;
        self.is_aggregating = true;
        self.phase = Phase::RoutesPending;

        Some(RouteTicket {
            generation: self.generation,
            origin,
            destination,
        })
    }

    /// Applies an aggregation result if `ticket` is still current.
    ///
    /// Returns `false` and changes nothing for a stale ticket. A failed
    /// aggregation keeps the selection and records
    /// [`Notice::RoutesUnavailable`].
    pub fn complete_routes(
        &mut self,
        ticket: &RouteTicket,
        result: Result<RouteSet, AggregationError>,
    ) -> bool {
        if ticket.generation != self.generation || !self.is_aggregating {
            return false;
        }

        match result {
            Ok(routes) => self.routes = routes,
            Err(e) => {
                tracing::warn!(error = %e, "route aggregation failed");
                self.routes = RouteSet::new();
                self.notice = Some(Notice::RoutesUnavailable(e.to_string()));
            }
        }
        self.is_aggregating = false;
        self.phase = Phase::RoutesReady;
        true
    }

    /// Changes the displayed mode. Always allowed; a mode missing from the
    /// route set is simply shown as unavailable.
    pub fn set_active_mode(&mut self, mode: TravelMode) {
        self.active_mode = mode;
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        let transit = match (&self.query, &self.selected) {
            (Some(origin), Some(selected)) => selected
                .facility
                .location()
                .map(|destination| transit_url(origin, &destination)),
            _ => None,
        };

        SessionView {
            phase: self.phase,
            query: self.query.clone(),
            ranked_facilities: self.ranked.clone(),
            selected_facility: self.selected.clone(),
            route_set: self.routes.clone(),
            active_mode: self.active_mode,
            active_route: self.routes.get(self.active_mode).cloned(),
            is_aggregating: self.is_aggregating,
            notice: self.notice.clone(),
            transit_url: transit,
        }
    }
}

#[cfg(test)]
mod tests {
    use sedes_core::{Address, Attendance, Contact, Route};

    use super::*;

    fn facility(id: i64, lat: f64, lng: f64) -> Facility {
        Facility {
            id,
            name: format!("Sede {id}"),
            service_type: "Agencia del Ministerio Público".to_string(),
            purpose: None,
            address: Address::default(),
            contact: Contact::default(),
            attendance: Attendance::default(),
            latitude: Some(lat),
            longitude: Some(lng),
        }
    }

    fn state() -> SessionState {
        SessionState::new(
            vec![facility(1, 19.40, -99.15), facility(2, 19.43, -99.13)],
            3,
        )
    }

    fn query() -> GeoPoint {
        GeoPoint::new(19.43, -99.133)
    }

    fn routes(modes: &[TravelMode]) -> RouteSet {
        modes
            .iter()
            .map(|&mode| Route {
                mode,
                duration_minutes: 10.0,
                distance_km: 1.0,
                geometry: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn select_location_picks_nearest_and_goes_pending() {
        let mut s = state();
        let ticket = s.select_location(query()).expect("valid").expect("ticket");

        let view = s.view();
        assert_eq!(view.phase, Phase::RoutesPending);
        assert!(view.is_aggregating);
        assert_eq!(view.ranked_facilities.len(), 2);
        assert_eq!(view.selected_facility.as_ref().map(|r| r.facility.id), Some(2));
        assert!(view.route_set.is_empty());
        assert_eq!(view.active_mode, TravelMode::Driving);
        assert_eq!(ticket.destination().latitude, 19.43);
        assert_eq!(ticket.origin(), &query());
        assert!(view
            .transit_url
            .as_deref()
            .is_some_and(|u| u.contains("origin=19.43,-99.133&destination=19.43,-99.13")));
    }

    #[test]
    fn partial_routes_become_ready() {
        let mut s = state();
        let ticket = s.select_location(query()).expect("valid").expect("ticket");

        assert!(s.complete_routes(
            &ticket,
            Ok(routes(&[TravelMode::Driving, TravelMode::Walking]))
        ));

        let view = s.view();
        assert_eq!(view.phase, Phase::RoutesReady);
        assert!(!view.is_aggregating);
        assert_eq!(
            view.route_set.modes().collect::<Vec<_>>(),
            vec![TravelMode::Driving, TravelMode::Walking]
        );
        assert!(view.active_route.is_some());
    }

    #[test]
    fn completion_applies_once() {
        let mut s = state();
        let ticket = s.select_location(query()).expect("valid").expect("ticket");
        assert!(s.complete_routes(&ticket, Ok(routes(&[TravelMode::Driving]))));
        assert!(!s.complete_routes(&ticket, Ok(routes(&TravelMode::ALL))));
        assert_eq!(s.view().route_set.len(), 1);
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut s = state();
        let first = s.select_location(query()).expect("valid").expect("ticket");
        let second = s.select_facility(1).expect("ranked candidate");
        assert!(second.generation() > first.generation());

        assert!(!s.complete_routes(&first, Ok(routes(&TravelMode::ALL))));
        assert_eq!(s.phase(), Phase::RoutesPending);
        assert!(s.is_aggregating());

        assert!(s.complete_routes(&second, Ok(routes(&[TravelMode::Cycling]))));
        let view = s.view();
        assert_eq!(view.selected_facility.map(|r| r.facility.id), Some(1));
        assert_eq!(view.route_set.len(), 1);
    }

    #[test]
    fn invalid_selection_leaves_state_unchanged() {
        let mut s = state();
        let ticket = s.select_location(query()).expect("valid").expect("ticket");
        let generation = s.generation();

        assert_eq!(
            s.select_facility(99),
            Err(SessionError::InvalidSelection { id: 99 })
        );
        assert_eq!(s.generation(), generation);
        assert_eq!(s.view().selected_facility.map(|r| r.facility.id), Some(2));
        assert!(s.complete_routes(&ticket, Ok(RouteSet::new())));
    }

    #[test]
    fn select_facility_before_any_location_is_invalid() {
        let mut s = state();
        assert_eq!(
            s.select_facility(1),
            Err(SessionError::InvalidSelection { id: 1 })
        );
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn invalid_location_is_rejected() {
        let mut s = state();
        let err = s.select_location(GeoPoint::new(f64::NAN, 0.0)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidLocation { .. }));
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.view().query.is_none());
    }

    #[test]
    fn no_results_returns_to_idle_with_notice() {
        let mut s = SessionState::new(vec![facility(1, 0.0, 0.0)], 3);
        assert!(s.select_location(query()).expect("valid").is_none());

        let view = s.view();
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(view.notice, Some(Notice::NoResults));
        assert!(view.selected_facility.is_none());
        assert!(!view.is_aggregating);
    }

    #[test]
    fn new_location_invalidates_pending_ticket() {
        let mut s = state();
        let first = s.select_location(query()).expect("valid").expect("ticket");
        let _second = s
            .select_location(GeoPoint::new(19.40, -99.151))
            .expect("valid")
            .expect("ticket");
        assert!(!s.complete_routes(&first, Ok(routes(&TravelMode::ALL))));
        assert_eq!(s.view().selected_facility.map(|r| r.facility.id), Some(1));
    }

    #[test]
    fn aggregation_failure_keeps_selection() {
        let mut s = state();
        let ticket = s.select_location(query()).expect("valid").expect("ticket");

        assert!(s.complete_routes(
            &ticket,
            Err(AggregationError::Unavailable("no token".to_string()))
        ));

        let view = s.view();
        assert_eq!(view.phase, Phase::RoutesReady);
        assert!(view.route_set.is_empty());
        assert_eq!(view.ranked_facilities.len(), 2);
        assert!(view.selected_facility.is_some());
        assert!(matches!(
            view.notice,
            Some(Notice::RoutesUnavailable(ref r)) if r.contains("no token")
        ));
    }

    #[test]
    fn active_mode_switch_needs_no_recompute() {
        let mut s = state();
        let ticket = s.select_location(query()).expect("valid").expect("ticket");
        s.complete_routes(&ticket, Ok(routes(&[TravelMode::Driving, TravelMode::Walking])));
        let generation = s.generation();

        s.set_active_mode(TravelMode::Walking);
        assert_eq!(s.view().active_route.map(|r| r.mode), Some(TravelMode::Walking));

        s.set_active_mode(TravelMode::Cycling);
        let view = s.view();
        assert_eq!(view.active_mode, TravelMode::Cycling);
        assert!(view.active_route.is_none());
        assert_eq!(s.generation(), generation);
    }

    #[test]
    fn reselection_resets_mode_and_routes() {
        let mut s = state();
        let ticket = s.select_location(query()).expect("valid").expect("ticket");
        s.complete_routes(&ticket, Ok(routes(&TravelMode::ALL)));
        s.set_active_mode(TravelMode::Cycling);

        s.select_facility(1).expect("ranked candidate");
        let view = s.view();
        assert_eq!(view.active_mode, TravelMode::Driving);
        assert!(view.route_set.is_empty());
        assert!(view.is_aggregating);
    }

    #[test]
    fn view_serializes_for_presentation() {
        let mut s = state();
        s.select_location(query()).expect("valid");
        let json = serde_json::to_value(s.view()).expect("serialize");
        assert_eq!(json["phase"], "routes_pending");
        assert_eq!(json["active_mode"], "driving");
        assert_eq!(json["is_aggregating"], true);
        assert_eq!(json["selected_facility"]["id"], 2);
    }
}
