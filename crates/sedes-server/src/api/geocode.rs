use axum::{
    extract::{Query, State},
    Extension, Json,
};
use sedes_core::GeoPoint;
use sedes_opendata::SourceError;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct GeocodeQuery {
    pub q: Option<String>,
}

pub(super) async fn geocode(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<GeocodeQuery>,
) -> Result<Json<ApiResponse<Vec<GeoPoint>>>, ApiError> {
    let q = query.q.unwrap_or_default();

    let points = state.geocoder.forward(&q).await.map_err(|e| match e {
        SourceError::EmptyQuery => {
            ApiError::new(req_id.0.clone(), "bad_request", "missing search query 'q'")
        }
        SourceError::MissingToken => ApiError::new(
            req_id.0.clone(),
            "geocoding_unavailable",
            "geocoding is not configured",
        ),
        other => {
            tracing::warn!(error = %other, "geocoding request failed");
            ApiError::new(req_id.0.clone(), "upstream_error", "geocoding request failed")
        }
    })?;

    Ok(Json(ApiResponse {
        data: points,
        meta: ResponseMeta::new(req_id.0),
    }))
}
