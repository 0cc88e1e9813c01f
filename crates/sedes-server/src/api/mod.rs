mod facilities;
mod geocode;
mod routes;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use sedes_directions::{DirectionsProvider, MapboxDirectionsClient, RouteAggregator};
use sedes_opendata::{MapboxGeocoder, SnapshotOrigin};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::cache::FacilityCache;
use crate::middleware::{request_id, RequestId};

/// Shared-cache policy for the facility listing: fresh for a day, served
/// stale for half a day more while revalidating.
pub const FACILITY_CACHE_CONTROL: &str = "public, s-maxage=86400, stale-while-revalidate=43200";

const MAX_NEAREST: usize = 20;

#[derive(Clone)]
pub struct AppState {
    pub facilities: FacilityCache,
    pub routes: Arc<RouteAggregator<MapboxDirectionsClient>>,
    pub geocoder: Arc<MapboxGeocoder>,
    pub nearest_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    facilities: usize,
    located_facilities: usize,
    facility_origin: SnapshotOrigin,
    facilities_fetched_at: DateTime<Utc>,
    routing: &'static str,
    geocoding: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            "facilities_unavailable" | "routes_unavailable" | "geocoding_unavailable" => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Requested candidate count, defaulting to the configured count and capped
/// at 20. Zero is passed through and ranks nothing.
pub(super) fn normalize_count(count: Option<usize>, default: usize) -> usize {
    count.unwrap_or(default).min(MAX_NEAREST)
}

/// Cache-Control for the facility listing, set on successful responses only.
fn facility_cache_control(response: &Response) -> Option<HeaderValue> {
    response
        .status()
        .is_success()
        .then(|| HeaderValue::from_static(FACILITY_CACHE_CONTROL))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/facilities",
            get(facilities::list_facilities).layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                facility_cache_control,
            )),
        )
        .route(
            "/api/v1/facilities/nearest",
            get(facilities::nearest_facilities),
        )
        .route("/api/v1/geocode", get(geocode::geocode))
        .route("/api/v1/routes", get(routes::routes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let snapshot = state.facilities.current().await;
    let routing = if state.routes.provider().preflight().is_ok() {
        "configured"
    } else {
        "unconfigured"
    };
    let geocoding = if state.geocoder.is_configured() {
        "configured"
    } else {
        "unconfigured"
    };

    Json(ApiResponse {
        data: HealthData {
            status: if snapshot.is_available() { "ok" } else { "degraded" },
            facilities: snapshot.facilities.len(),
            located_facilities: snapshot.located_count(),
            facility_origin: snapshot.origin,
            facilities_fetched_at: snapshot.fetched_at,
            routing,
            geocoding,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
