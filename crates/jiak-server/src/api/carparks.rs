use axum::{
    extract::{Query, State},
    Extension, Json,
};
use jiak_carpark::CarparkRecord;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_carpark_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CarparkAvailability {
    pub total_available_lots: i64,
    pub carparks: Vec<CarparkRecord>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CarparkQuery {
    pub development: Option<String>,
}

/// Full availability table, optionally narrowed to developments matching
/// `development`. Every call walks all pages afresh.
pub(super) async fn list_carparks(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CarparkQuery>,
) -> Result<Json<ApiResponse<CarparkAvailability>>, ApiError> {
    let Some(client) = state.carparks.as_ref() else {
        return Err(ApiError::new(
            req_id.0,
            "not_configured",
            "carpark availability requires DATAMALL_ACCOUNT_KEY",
        ));
    };

    let records = client
        .fetch_all_carparks(state.carpark_limits)
        .await
        .map_err(|e| map_carpark_error(req_id.0.clone(), &e))?;

    let term = query.development.as_deref().unwrap_or_default();
    let carparks: Vec<CarparkRecord> = records
        .into_iter()
        .filter(|r| r.matches_development(term))
        .collect();
    let total_available_lots = carparks.iter().map(|r| r.available_lots.max(0)).sum();

    Ok(Json(ApiResponse::new(
        CarparkAvailability {
            total_available_lots,
            carparks,
        },
        req_id.0,
    )))
}
