//! Route estimation and the end-to-end `locate` flow.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sedes_core::{
    format_distance, format_duration, transit_url, AppConfig, GeoPoint, RouteSet, TravelMode,
};
use sedes_directions::{MapboxDirectionsClient, RouteAggregator};
use sedes_opendata::MapboxGeocoder;
use sedes_session::{Notice, SessionController, SessionState, SessionView};

use crate::facilities::load_snapshot;

fn build_aggregator(config: &AppConfig) -> anyhow::Result<RouteAggregator<MapboxDirectionsClient>> {
    let client = MapboxDirectionsClient::from_config(config)?;
    Ok(RouteAggregator::new(client)
        .with_request_timeout(Duration::from_secs(config.directions_timeout_secs)))
}

/// Render one line per requested mode, marking missing ones unavailable.
pub(crate) fn render_routes(routes: &RouteSet, modes: &[TravelMode]) -> Vec<String> {
    modes
        .iter()
        .map(|&mode| match routes.get(mode) {
            Some(route) => format!(
                "{:<9}{:<12}{}",
                mode.as_str(),
                format_duration(route.duration_minutes),
                format_distance(route.distance_km)
            ),
            None => format!("{:<9}unavailable", mode.as_str()),
        })
        .collect()
}

/// Print route estimates between two points.
///
/// # Errors
///
/// Returns an error if the modes are invalid or routing is unavailable.
pub(crate) async fn run_routes(
    config: &AppConfig,
    from: (f64, f64),
    to: (f64, f64),
    modes: Option<&str>,
) -> anyhow::Result<()> {
    let modes = TravelMode::parse_list(modes.unwrap_or_default())?;
    let origin = GeoPoint::new(from.0, from.1);
    let destination = GeoPoint::new(to.0, to.1);

    let routes = build_aggregator(config)?
        .aggregate_routes(&origin, &destination, &modes)
        .await?;

    for line in render_routes(&routes, &modes) {
        println!("{line}");
    }
    println!("{:<9}{}", "transit", transit_url(&origin, &destination));
    Ok(())
}

/// Geocode `address`, select the nearest facility (or `pick`), and print
/// its routes.
///
/// # Errors
///
/// Returns an error if geocoding fails or finds nothing, the snapshot cannot
/// be loaded, or `pick` is not one of the ranked candidates.
pub(crate) async fn run_locate(
    config: &AppConfig,
    address: &str,
    count: Option<usize>,
    pick: Option<i64>,
) -> anyhow::Result<()> {
    let geocoder = MapboxGeocoder::from_config(config)?;
    let point = geocoder
        .forward(address)
        .await?
        .into_iter()
        .next()
        .with_context(|| format!("no match for address '{address}' in the service area"))?;
    println!(
        "location: {} ({})",
        point.label.as_deref().unwrap_or(address),
        point.lat_lng()
    );

    let snapshot = load_snapshot(config).await?;
    let state = SessionState::new(
        snapshot.facilities,
        count.unwrap_or(config.nearest_count).max(1),
    );
    let session = SessionController::new(state, Arc::new(build_aggregator(config)?));

    let mut view = session.select_location(point).await?;
    if let Some(id) = pick {
        view = session.select_facility(id).await?;
    }

    print_view(&view);
    Ok(())
}

fn print_view(view: &SessionView) {
    if matches!(view.notice, Some(Notice::NoResults)) {
        println!("no located facilities near this location");
        return;
    }

    println!();
    println!("candidates:");
    for entry in &view.ranked_facilities {
        let marker = if view
            .selected_facility
            .as_ref()
            .is_some_and(|s| s.facility.id == entry.facility.id)
        {
            "*"
        } else {
            " "
        };
        println!(
            " {marker} {:<6}{:<10}{}",
            entry.facility.id,
            format_distance(entry.distance_km),
            entry.facility.name
        );
    }

    let Some(selected) = &view.selected_facility else {
        return;
    };
    let facility = &selected.facility;
    println!();
    println!("{}", facility.name);
    println!("  {}", facility.display_address());
    for phone in &facility.contact.phones {
        match &phone.extension {
            Some(ext) => println!("  tel. {} ext. {ext}", phone.number),
            None => println!("  tel. {}", phone.number),
        }
    }
    if let Some(hours) = &facility.attendance.hours {
        println!("  {hours}");
    }

    println!();
    if let Some(Notice::RoutesUnavailable(reason)) = &view.notice {
        println!("routes unavailable: {reason}");
    } else {
        for line in render_routes(&view.route_set, &TravelMode::ALL) {
            println!("{line}");
        }
    }
    if let Some(url) = &view.transit_url {
        println!("{:<9}{url}", "transit");
    }
}
