//! Multi-modal route aggregation over an external directions provider.

pub mod aggregate;
pub mod client;
pub mod error;
pub mod provider;
pub mod types;

pub use aggregate::{RouteAggregator, DEFAULT_REQUEST_TIMEOUT};
pub use client::MapboxDirectionsClient;
pub use error::{AggregationError, DirectionsError};
pub use provider::DirectionsProvider;
