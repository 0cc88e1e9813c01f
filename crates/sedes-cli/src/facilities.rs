//! Facility listing and ranking commands.

use sedes_core::{format_distance, nearest_k, AppConfig, GeoPoint, RankError};
use sedes_opendata::{FacilityLoader, FacilitySnapshot};

/// Loads the facility snapshot the same way the server does.
pub(crate) async fn load_snapshot(config: &AppConfig) -> anyhow::Result<FacilitySnapshot> {
    let loader = FacilityLoader::from_config(config)?;
    let snapshot = loader.load().await?;
    tracing::info!(
        count = snapshot.facilities.len(),
        located = snapshot.located_count(),
        origin = ?snapshot.origin,
        "facility snapshot loaded"
    );
    Ok(snapshot)
}

/// Print every facility, or the snapshot as JSON with `json`.
///
/// # Errors
///
/// Returns an error if neither the live source nor the fallback file can be
/// loaded.
pub(crate) async fn run_facilities(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let snapshot = load_snapshot(config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!(
        "{} facilities ({:?}, fetched {})",
        snapshot.facilities.len(),
        snapshot.origin,
        snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!("{:<6}{:<10}NAME", "ID", "LOCATED");
    for facility in &snapshot.facilities {
        let located = if facility.location().is_some() { "yes" } else { "no" };
        println!("{:<6}{:<10}{}", facility.id, located, facility.name);
    }

    Ok(())
}

/// Print the facilities closest to (`lat`, `lng`).
///
/// # Errors
///
/// Returns an error if the snapshot cannot be loaded or the point is invalid.
pub(crate) async fn run_nearest(
    config: &AppConfig,
    lat: f64,
    lng: f64,
    count: Option<usize>,
) -> anyhow::Result<()> {
    let snapshot = load_snapshot(config).await?;
    let point = GeoPoint::new(lat, lng);
    let k = count.unwrap_or(config.nearest_count);

    let ranked = match nearest_k(&snapshot.facilities, &point, k) {
        Ok(ranked) => ranked,
        Err(RankError::NotFound) => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    if ranked.is_empty() {
        println!("no located facilities near {}", point.lat_lng());
        return Ok(());
    }

    println!("{:<4}{:<6}{:<10}NAME / ADDRESS", "#", "ID", "DISTANCE");
    for (rank, entry) in ranked.iter().enumerate() {
        println!(
            "{:<4}{:<6}{:<10}{}",
            rank + 1,
            entry.facility.id,
            format_distance(entry.distance_km),
            entry.facility.name
        );
        let address = entry.facility.display_address();
        if !address.is_empty() {
            println!("{:<20}{}", "", address);
        }
    }

    Ok(())
}
