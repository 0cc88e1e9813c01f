//! Upstream data collaborators: the open facility dataset and forward
//! geocoding.

pub mod error;
pub mod facilities;
pub mod geocode;
pub mod normalize;
pub mod types;

pub use error::SourceError;
pub use facilities::{FacilityLoader, FacilitySnapshot, SnapshotOrigin};
pub use geocode::MapboxGeocoder;
pub use normalize::{normalize_record, parse_facilities};
