//! Concurrent per-mode route aggregation.
//!
//! Every requested mode is fetched concurrently and the batch is joined
//! all-settled: a mode that fails, times out, or comes back without
//! candidates is logged and left out of the [`RouteSet`]. Only a provider
//! that cannot serve anything, or an invalid endpoint, fails the call.

use std::time::Duration;

use futures::future::join_all;
use sedes_core::{GeoPoint, Route, RouteSet, TravelMode};

use crate::error::{AggregationError, DirectionsError};
use crate::provider::DirectionsProvider;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Fans out directions requests across travel modes.
#[derive(Debug, Clone)]
pub struct RouteAggregator<P> {
    provider: P,
    request_timeout: Duration,
}

impl<P: DirectionsProvider> RouteAggregator<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Bounds each per-mode request. A request exceeding it counts as that
    /// mode failing.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Resolves one route per distinct mode in `modes`.
    ///
    /// Duplicate modes are requested once. The result never depends on the
    /// order in which responses arrive.
    ///
    /// # Errors
    ///
    /// - [`AggregationError::InvalidEndpoint`] if either point is not a valid
    ///   coordinate.
    /// - [`AggregationError::Unavailable`] if the provider's preflight check
    ///   fails; no request is issued in that case.
    pub async fn aggregate_routes(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        modes: &[TravelMode],
    ) -> Result<RouteSet, AggregationError> {
        ensure_endpoint("origin", origin)?;
        ensure_endpoint("destination", destination)?;
        self.provider
            .preflight()
            .map_err(|e| AggregationError::Unavailable(e.to_string()))?;

        let mut distinct: Vec<TravelMode> = Vec::with_capacity(modes.len());
        for &mode in modes {
            if !distinct.contains(&mode) {
                distinct.push(mode);
            }
        }

        let outcomes = join_all(distinct.iter().map(|&mode| async move {
            (mode, self.fetch_one(mode, origin, destination).await)
        }))
        .await;

        let mut routes = RouteSet::new();
        for (mode, outcome) in outcomes {
            match outcome {
                Ok(route) => routes.insert(route),
                Err(e) => {
                    tracing::warn!(mode = %mode, error = %e, "route unavailable for mode");
                }
            }
        }

        tracing::debug!(
            requested = distinct.len(),
            resolved = routes.len(),
            "route aggregation finished"
        );
        Ok(routes)
    }

    /// [`RouteAggregator::aggregate_routes`] over every computed travel mode.
    ///
    /// # Errors
    ///
    /// Same as [`RouteAggregator::aggregate_routes`].
    pub async fn aggregate_all(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<RouteSet, AggregationError> {
        self.aggregate_routes(origin, destination, &TravelMode::ALL)
            .await
    }

    async fn fetch_one(
        &self,
        mode: TravelMode,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<Route, DirectionsError> {
        let candidates = tokio::time::timeout(
            self.request_timeout,
            self.provider.directions(mode, origin, destination),
        )
        .await
        .map_err(|_| DirectionsError::Timeout {
            mode,
            after: self.request_timeout,
        })??;

        let mut first = candidates
            .into_iter()
            .next()
            .ok_or(DirectionsError::NoRoute { mode })?;
        first.mode = mode;
        Ok(first)
    }
}

fn ensure_endpoint(role: &'static str, point: &GeoPoint) -> Result<(), AggregationError> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(AggregationError::InvalidEndpoint {
            role,
            latitude: point.latitude,
            longitude: point.longitude,
        })
    }
}
