mod api;
mod cache;
mod middleware;
mod scheduler;

use std::sync::Arc;
use std::time::Duration;

use sedes_directions::{MapboxDirectionsClient, RouteAggregator};
use sedes_opendata::{FacilityLoader, MapboxGeocoder};
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    cache::FacilityCache,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(sedes_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting sedes-server");
    if config.mapbox_token.is_none() {
        tracing::warn!(
            "MAPBOX_TOKEN not set; routing and geocoding endpoints will report unavailable"
        );
    }

    let loader = Arc::new(FacilityLoader::from_config(&config)?);
    let facilities = FacilityCache::load(&loader).await;
    {
        let snapshot = facilities.current().await;
        tracing::info!(
            count = snapshot.facilities.len(),
            located = snapshot.located_count(),
            origin = ?snapshot.origin,
            "facility snapshot ready"
        );
    }

    let directions = MapboxDirectionsClient::from_config(&config)?;
    let routes = RouteAggregator::new(directions)
        .with_request_timeout(Duration::from_secs(config.directions_timeout_secs));
    let geocoder = MapboxGeocoder::from_config(&config)?;

    let _scheduler = scheduler::build_scheduler(
        Arc::clone(&loader),
        facilities.clone(),
        &config.facility_refresh_cron,
    )
    .await?;

    let app = build_app(AppState {
        facilities,
        routes: Arc::new(routes),
        geocoder: Arc::new(geocoder),
        nearest_count: config.nearest_count,
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
