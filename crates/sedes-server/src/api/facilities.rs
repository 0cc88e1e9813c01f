use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use sedes_core::{nearest_k, Facility, GeoPoint, RankError, RankedFacility};
use sedes_opendata::SnapshotOrigin;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{normalize_count, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct NearestQuery {
    pub lat: f64,
    pub lng: f64,
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct FacilityList {
    total: usize,
    origin: SnapshotOrigin,
    fetched_at: DateTime<Utc>,
    facilities: Vec<Facility>,
}

#[derive(Debug, Serialize)]
pub(super) struct NearestList {
    query: GeoPoint,
    facilities: Vec<RankedFacility>,
}

pub(super) async fn list_facilities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<FacilityList>>, ApiError> {
    let snapshot = state.facilities.current().await;
    if !snapshot.is_available() {
        return Err(ApiError::new(
            req_id.0,
            "facilities_unavailable",
            "facility sources are unavailable; retry after the next refresh",
        ));
    }

    Ok(Json(ApiResponse {
        data: FacilityList {
            total: snapshot.facilities.len(),
            origin: snapshot.origin,
            fetched_at: snapshot.fetched_at,
            facilities: snapshot.facilities.clone(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn nearest_facilities(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<NearestQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<NearestList>>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    let point = GeoPoint::new(query.lat, query.lng);
    let count = normalize_count(query.k, state.nearest_count);
    let snapshot = state.facilities.current().await;

    let facilities = match nearest_k(&snapshot.facilities, &point, count) {
        Ok(ranked) => ranked,
        Err(RankError::NotFound) => Vec::new(),
        Err(e @ RankError::InvalidQueryPoint { .. }) => {
            return Err(ApiError::new(req_id.0, "validation_error", e.to_string()));
        }
    };

    Ok(Json(ApiResponse {
        data: NearestList {
            query: point,
            facilities,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
