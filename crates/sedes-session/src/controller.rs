//! Async driver around [`SessionState`].
//!
//! The state lock is released while routes are aggregated, so a newer
//! selection can land mid-flight; the older result is then discarded by its
//! ticket generation.

use std::sync::Arc;

use sedes_core::{GeoPoint, TravelMode};
use sedes_directions::{DirectionsProvider, RouteAggregator};
use tokio::sync::Mutex;

use crate::error::SessionError;
use crate::state::{RouteTicket, SessionState};
use crate::view::SessionView;

pub struct SessionController<P> {
    state: Mutex<SessionState>,
    aggregator: Arc<RouteAggregator<P>>,
}

impl<P: DirectionsProvider> SessionController<P> {
    #[must_use]
    pub fn new(state: SessionState, aggregator: Arc<RouteAggregator<P>>) -> Self {
        Self {
            state: Mutex::new(state),
            aggregator,
        }
    }

    /// Ranks around `point`, selects the nearest facility and resolves its
    /// routes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidLocation`] for an invalid point.
    pub async fn select_location(&self, point: GeoPoint) -> Result<SessionView, SessionError> {
        let ticket = self.state.lock().await.select_location(point)?;
        if let Some(ticket) = ticket {
            self.resolve(ticket).await;
        }
        Ok(self.view().await)
    }

    /// Selects another ranked candidate and resolves its routes.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidSelection`] if `id` is not a ranked
    /// candidate.
    pub async fn select_facility(&self, id: i64) -> Result<SessionView, SessionError> {
        let ticket = self.state.lock().await.select_facility(id)?;
        self.resolve(ticket).await;
        Ok(self.view().await)
    }

    pub async fn set_active_mode(&self, mode: TravelMode) -> SessionView {
        let mut state = self.state.lock().await;
        state.set_active_mode(mode);
        state.view()
    }

    pub async fn view(&self) -> SessionView {
        self.state.lock().await.view()
    }

    async fn resolve(&self, ticket: RouteTicket) {
        let result = self
            .aggregator
            .aggregate_all(ticket.origin(), ticket.destination())
            .await;

        let applied = self.state.lock().await.complete_routes(&ticket, result);
        if !applied {
            tracing::debug!(
                generation = ticket.generation(),
                "discarded route result for superseded selection"
            );
        }
    }
}
