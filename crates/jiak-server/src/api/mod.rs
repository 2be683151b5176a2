mod carparks;
mod featured;
mod malls;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use jiak_carpark::{CarparkError, DatamallClient, PageLimits};
use jiak_store::{MallStore, StoreError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Handles shared by every request. Built once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub malls: Arc<MallStore>,
    /// `None` when no DataMall account key is configured.
    pub carparks: Option<Arc<DatamallClient>>,
    pub carpark_limits: PageLimits,
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

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    carparks: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
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
            "not_configured" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    tracing::error!(error = %error, "document store request failed");
    match error {
        StoreError::InvalidBaseUrl { .. } => {
            ApiError::new(request_id, "internal_error", "document store is misconfigured")
        }
        _ => ApiError::new(request_id, "upstream_error", "document store request failed"),
    }
}

pub(super) fn map_carpark_error(request_id: String, error: &CarparkError) -> ApiError {
    tracing::error!(error = %error, "carpark availability fetch failed");
    match error {
        CarparkError::PageFetch { offset, .. } => ApiError::new(
            request_id,
            "upstream_error",
            format!("carpark availability fetch failed at offset {offset}"),
        ),
        CarparkError::PaginationLimit { max_pages, .. } => ApiError::new(
            request_id,
            "upstream_error",
            format!("carpark availability exceeded {max_pages} pages"),
        ),
        _ => ApiError::new(request_id, "internal_error", "carpark availability fetch failed"),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/malls", get(malls::list_malls))
        .route("/api/v1/malls/nearest", get(malls::nearest_mall))
        .route("/api/v1/malls/{mall_id}", get(malls::get_mall))
        .route("/api/v1/search/suggestions", get(malls::search_suggestions))
        .route("/api/v1/featured", get(featured::get_featured))
        .route("/api/v1/carparks", get(carparks::list_carparks))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .merge(api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let carparks = if state.carparks.is_some() {
        "configured"
    } else {
        "not_configured"
    };
    Json(ApiResponse::new(
        HealthData {
            status: "ok",
            carparks,
        },
        req_id.0,
    ))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
