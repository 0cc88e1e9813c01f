//! Nearest-facility ranking.
//!
//! Both operations are pure: they read the facility slice, compute haversine
//! distances to the query point, and never touch the network or mutate input.
//! Facilities without a usable coordinate are skipped rather than failing the
//! ranking of the rest.

use serde::Serialize;

use crate::distance::distance_km;
use crate::error::RankError;
use crate::facility::Facility;
use crate::geo::GeoPoint;

/// A facility annotated with its distance from a specific query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFacility {
    #[serde(flatten)]
    pub facility: Facility,
    pub distance_km: f64,
}

/// Returns the facility closest to `query`.
///
/// Equidistant facilities resolve to the first one in collection order.
///
/// # Errors
///
/// - [`RankError::InvalidQueryPoint`] if `query` is not a valid coordinate.
/// - [`RankError::NotFound`] if no facility has a usable coordinate.
pub fn nearest_one(
    facilities: &[Facility],
    query: &GeoPoint,
) -> Result<RankedFacility, RankError> {
    ensure_valid(query)?;

    let mut nearest: Option<(&Facility, f64)> = None;
    for (facility, distance) in located(facilities, query) {
        // Strict less-than keeps the earliest facility on ties.
        if nearest.is_none_or(|(_, best)| distance < best) {
            nearest = Some((facility, distance));
        }
    }

    nearest
        .map(|(facility, distance_km)| RankedFacility {
            facility: facility.clone(),
            distance_km,
        })
        .ok_or(RankError::NotFound)
}

/// Returns up to `k` facilities ordered by ascending distance from `query`.
///
/// The sort is stable, so equidistant facilities keep their collection order.
/// Fewer than `k` located facilities yields all of them; `k == 0` yields an
/// empty list.
///
/// # Errors
///
/// Returns [`RankError::InvalidQueryPoint`] if `query` is not a valid
/// coordinate.
pub fn nearest_k(
    facilities: &[Facility],
    query: &GeoPoint,
    k: usize,
) -> Result<Vec<RankedFacility>, RankError> {
    ensure_valid(query)?;
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut ranked: Vec<RankedFacility> = located(facilities, query)
        .map(|(facility, distance_km)| RankedFacility {
            facility: facility.clone(),
            distance_km,
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(k);
    Ok(ranked)
}

fn ensure_valid(query: &GeoPoint) -> Result<(), RankError> {
    if query.is_valid() {
        Ok(())
    } else {
        Err(RankError::InvalidQueryPoint {
            latitude: query.latitude,
            longitude: query.longitude,
        })
    }
}

fn located<'a>(
    facilities: &'a [Facility],
    query: &'a GeoPoint,
) -> impl Iterator<Item = (&'a Facility, f64)> + 'a {
    facilities.iter().filter_map(move |facility| {
        let location = facility.location()?;
        Some((facility, distance_km(query, &location)))
    })
}
