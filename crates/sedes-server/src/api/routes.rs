use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use sedes_core::{transit_url, GeoPoint, RouteSet, TravelMode};
use sedes_directions::AggregationError;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct RoutesQuery {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub dest_lat: f64,
    pub dest_lng: f64,
    /// Comma-separated travel modes; all modes when absent.
    pub modes: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RoutesData {
    origin: GeoPoint,
    destination: GeoPoint,
    routes: RouteSet,
    /// Requested modes the provider could not resolve.
    unavailable: Vec<TravelMode>,
    transit_url: String,
}

pub(super) async fn routes(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<RoutesQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<RoutesData>>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;
    let modes = TravelMode::parse_list(query.modes.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let origin = GeoPoint::new(query.origin_lat, query.origin_lng);
    let destination = GeoPoint::new(query.dest_lat, query.dest_lng);

    let routes = state
        .routes
        .aggregate_routes(&origin, &destination, &modes)
        .await
        .map_err(|e| match e {
            AggregationError::Unavailable(_) => {
                ApiError::new(req_id.0.clone(), "routes_unavailable", e.to_string())
            }
            AggregationError::InvalidEndpoint { .. } => {
                ApiError::new(req_id.0.clone(), "validation_error", e.to_string())
            }
        })?;

    let mut unavailable: Vec<TravelMode> = modes
        .into_iter()
        .filter(|m| !routes.contains(*m))
        .collect();
    unavailable.sort_unstable();
    unavailable.dedup();

    Ok(Json(ApiResponse {
        data: RoutesData {
            transit_url: transit_url(&origin, &destination),
            origin,
            destination,
            routes,
            unavailable,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
