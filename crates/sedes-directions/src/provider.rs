use std::future::Future;

use sedes_core::{GeoPoint, Route, TravelMode};

use crate::error::DirectionsError;

/// A source of route candidates for one travel mode between two points.
pub trait DirectionsProvider: Send + Sync {
    /// Returns the provider's route candidates, best first. An empty list
    /// means the provider found no route.
    fn directions(
        &self,
        mode: TravelMode,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> impl Future<Output = Result<Vec<Route>, DirectionsError>> + Send;

    /// Checks, without network access, whether the provider can serve
    /// requests at all.
    ///
    /// # Errors
    ///
    /// Returns the reason the provider is unusable.
    fn preflight(&self) -> Result<(), DirectionsError> {
        Ok(())
    }
}
