//! Aggregation behaviour against a scripted in-memory provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sedes_core::{GeoPoint, Route, TravelMode};
use sedes_directions::{AggregationError, DirectionsError, DirectionsProvider, RouteAggregator};

#[derive(Clone, Copy)]
enum Script {
    Route { minutes: f64, delay_ms: u64 },
    Empty,
    Fail,
    Hang,
}

#[derive(Default)]
struct Counters {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

struct ScriptedProvider {
    scripts: HashMap<TravelMode, Script>,
    ready: bool,
    counters: Arc<Counters>,
}

impl ScriptedProvider {
    fn new(scripts: &[(TravelMode, Script)]) -> Self {
        Self {
            scripts: scripts.iter().copied().collect(),
            ready: true,
            counters: Arc::new(Counters::default()),
        }
    }

    fn unavailable() -> Self {
        Self {
            ready: false,
            ..Self::new(&[])
        }
    }
}

fn route(mode: TravelMode, minutes: f64) -> Route {
    Route {
        mode,
        duration_minutes: minutes,
        distance_km: minutes / 2.0,
        geometry: vec![[-99.133, 19.43], [-99.13, 19.43]],
    }
}

impl DirectionsProvider for ScriptedProvider {
    async fn directions(
        &self,
        mode: TravelMode,
        _origin: &GeoPoint,
        _destination: &GeoPoint,
    ) -> Result<Vec<Route>, DirectionsError> {
        self.counters.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let outcome = match self.scripts.get(&mode).copied().unwrap_or(Script::Fail) {
            Script::Route { minutes, delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(vec![route(mode, minutes), route(mode, minutes * 3.0)])
            }
            Script::Empty => Ok(Vec::new()),
            Script::Fail => Err(DirectionsError::Provider {
                status: 500,
                message: "upstream exploded".to_string(),
            }),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(vec![route(mode, 1.0)])
            }
        };

        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    fn preflight(&self) -> Result<(), DirectionsError> {
        if self.ready {
            Ok(())
        } else {
            Err(DirectionsError::MissingToken)
        }
    }
}

fn origin() -> GeoPoint {
    GeoPoint::new(19.43, -99.133)
}

fn destination() -> GeoPoint {
    GeoPoint::new(19.43, -99.13)
}

fn ok(minutes: f64, delay_ms: u64) -> Script {
    Script::Route { minutes, delay_ms }
}

#[tokio::test]
async fn all_modes_succeed() {
    let provider = ScriptedProvider::new(&[
        (TravelMode::Driving, ok(10.0, 0)),
        (TravelMode::Walking, ok(50.0, 0)),
        (TravelMode::Cycling, ok(20.0, 0)),
    ]);
    let aggregator = RouteAggregator::new(provider);

    let routes = aggregator
        .aggregate_all(&origin(), &destination())
        .await
        .expect("aggregation");

    assert_eq!(routes.len(), 3);
    let driving = routes.get(TravelMode::Driving).expect("driving");
    assert!((driving.duration_minutes - 10.0).abs() < f64::EPSILON);
    let walking = routes.get(TravelMode::Walking).expect("walking");
    assert!((walking.duration_minutes - 50.0).abs() < f64::EPSILON);
    let cycling = routes.get(TravelMode::Cycling).expect("cycling");
    assert!((cycling.duration_minutes - 20.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn failed_mode_is_omitted_not_fatal() {
    let provider = ScriptedProvider::new(&[
        (TravelMode::Driving, ok(10.0, 0)),
        (TravelMode::Walking, ok(50.0, 0)),
        (TravelMode::Cycling, Script::Fail),
    ]);
    let aggregator = RouteAggregator::new(provider);

    let routes = aggregator
        .aggregate_all(&origin(), &destination())
        .await
        .expect("aggregation");

    assert_eq!(
        routes.modes().collect::<Vec<_>>(),
        vec![TravelMode::Driving, TravelMode::Walking]
    );
    assert!(routes.get(TravelMode::Cycling).is_none());
}

#[tokio::test]
async fn empty_candidates_count_as_failure() {
    let provider = ScriptedProvider::new(&[
        (TravelMode::Driving, Script::Empty),
        (TravelMode::Walking, ok(50.0, 0)),
    ]);
    let aggregator = RouteAggregator::new(provider);

    let routes = aggregator
        .aggregate_routes(
            &origin(),
            &destination(),
            &[TravelMode::Driving, TravelMode::Walking],
        )
        .await
        .expect("aggregation");

    assert_eq!(routes.modes().collect::<Vec<_>>(), vec![TravelMode::Walking]);
}

#[tokio::test]
async fn every_mode_failing_still_yields_empty_set() {
    let provider = ScriptedProvider::new(&[]);
    let aggregator = RouteAggregator::new(provider);

    let routes = aggregator
        .aggregate_all(&origin(), &destination())
        .await
        .expect("aggregation");

    assert!(routes.is_empty());
}

#[tokio::test]
async fn first_candidate_is_taken() {
    let provider = ScriptedProvider::new(&[(TravelMode::Driving, ok(12.0, 0))]);
    let aggregator = RouteAggregator::new(provider);

    let routes = aggregator
        .aggregate_routes(&origin(), &destination(), &[TravelMode::Driving])
        .await
        .expect("aggregation");

    let driving = routes.get(TravelMode::Driving).expect("driving");
    assert!((driving.duration_minutes - 12.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn requests_are_issued_concurrently() {
    let provider = ScriptedProvider::new(&[
        (TravelMode::Driving, ok(10.0, 150)),
        (TravelMode::Walking, ok(50.0, 150)),
        (TravelMode::Cycling, ok(20.0, 150)),
    ]);
    let counters = Arc::clone(&provider.counters);
    let aggregator = RouteAggregator::new(provider);

    aggregator
        .aggregate_all(&origin(), &destination())
        .await
        .expect("aggregation");

    assert_eq!(counters.calls.load(Ordering::SeqCst), 3);
    assert_eq!(counters.peak_in_flight.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn result_is_independent_of_arrival_order() {
    let fast_driving = ScriptedProvider::new(&[
        (TravelMode::Driving, ok(10.0, 0)),
        (TravelMode::Walking, ok(50.0, 40)),
        (TravelMode::Cycling, ok(20.0, 80)),
    ]);
    let slow_driving = ScriptedProvider::new(&[
        (TravelMode::Driving, ok(10.0, 80)),
        (TravelMode::Walking, ok(50.0, 40)),
        (TravelMode::Cycling, ok(20.0, 0)),
    ]);

    let a = RouteAggregator::new(fast_driving)
        .aggregate_all(&origin(), &destination())
        .await
        .expect("aggregation");
    let b = RouteAggregator::new(slow_driving)
        .aggregate_all(&origin(), &destination())
        .await
        .expect("aggregation");

    assert_eq!(a, b);
}

#[tokio::test]
async fn duplicate_modes_are_requested_once() {
    let provider = ScriptedProvider::new(&[(TravelMode::Walking, ok(50.0, 0))]);
    let counters = Arc::clone(&provider.counters);
    let aggregator = RouteAggregator::new(provider);

    let routes = aggregator
        .aggregate_routes(
            &origin(),
            &destination(),
            &[TravelMode::Walking, TravelMode::Walking, TravelMode::Walking],
        )
        .await
        .expect("aggregation");

    assert_eq!(routes.len(), 1);
    assert_eq!(counters.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_mode_times_out_without_blocking_others() {
    let provider = ScriptedProvider::new(&[
        (TravelMode::Driving, ok(10.0, 0)),
        (TravelMode::Walking, Script::Hang),
        (TravelMode::Cycling, ok(20.0, 0)),
    ]);
    let aggregator =
        RouteAggregator::new(provider).with_request_timeout(Duration::from_millis(100));

    let started = std::time::Instant::now();
    let routes = aggregator
        .aggregate_all(&origin(), &destination())
        .await
        .expect("aggregation");

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(
        routes.modes().collect::<Vec<_>>(),
        vec![TravelMode::Driving, TravelMode::Cycling]
    );
}

#[tokio::test]
async fn unavailable_provider_fails_before_any_request() {
    let provider = ScriptedProvider::unavailable();
    let counters = Arc::clone(&provider.counters);
    let aggregator = RouteAggregator::new(provider);

    let err = aggregator
        .aggregate_all(&origin(), &destination())
        .await
        .unwrap_err();

    assert!(matches!(err, AggregationError::Unavailable(_)));
    assert_eq!(counters.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_endpoint_is_rejected() {
    let aggregator = RouteAggregator::new(ScriptedProvider::new(&[]));

    let err = aggregator
        .aggregate_all(&GeoPoint::new(95.0, 0.0), &destination())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AggregationError::InvalidEndpoint { role: "origin", .. }
    ));
}
