use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use jiak_core::filters::{
    featured_eatery, filter_malls, has_usable_logo, is_crowd_favorite, suggestions, top_dishes,
    unique_cuisines, EateryFilter, Suggestion,
};
use jiak_core::hours::{is_open_now, todays_hours, HOURS_NOT_AVAILABLE};
use jiak_core::{select_nearest, Eatery, GeoPoint, Locatable, Mall};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState};

/// Malls and eateries are all in Singapore.
const SGT_OFFSET_SECS: i32 = 8 * 3600;

#[derive(Debug, Serialize)]
pub(super) struct MallItem {
    pub id: String,
    pub name: String,
    pub location: String,
    pub region: Option<String>,
    pub coordinates: Option<GeoPoint>,
    /// Dropped when it points at a stock placeholder image.
    pub logo_url: Option<String>,
    pub stars: Option<f64>,
    pub total_reviews: Option<u64>,
    pub business_status: Option<String>,
    pub google_maps_url: Option<String>,
    pub eatery_count: usize,
}

impl From<&Mall> for MallItem {
    fn from(mall: &Mall) -> Self {
        Self {
            id: mall.id.clone(),
            name: mall.name.clone(),
            location: mall.location.clone(),
            region: mall.region.clone(),
            coordinates: mall.coordinates(),
            logo_url: mall
                .logo_url
                .clone()
                .filter(|u| has_usable_logo(Some(u.as_str()))),
            stars: mall.stars,
            total_reviews: mall.total_reviews,
            business_status: mall.business_status.clone(),
            google_maps_url: mall.google_maps_url.clone(),
            eatery_count: mall.eateries.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NearestMallItem {
    #[serde(flatten)]
    pub mall: MallItem,
    pub distance_meters: f64,
}

/// An eatery plus the values the listing derives from it.
#[derive(Debug, Serialize)]
pub(super) struct EateryItem {
    #[serde(flatten)]
    pub eatery: Eatery,
    pub crowd_favorite: bool,
    pub top_dishes: Vec<String>,
    pub todays_hours: String,
}

#[derive(Debug, Serialize)]
pub(super) struct MallDetail {
    #[serde(flatten)]
    pub mall: MallItem,
    pub cuisines: Vec<String>,
    pub featured_eatery: Option<EateryItem>,
    pub eateries: Vec<EateryItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MallListQuery {
    pub region: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearestQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Same mall search as the list endpoint, applied before ranking.
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MallDetailQuery {
    pub halal_only: Option<bool>,
    pub cuisine: Option<String>,
    pub min_rating: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SuggestionQuery {
    pub q: Option<String>,
}

pub(super) fn singapore_now() -> DateTime<FixedOffset> {
    let utc = Utc::now();
    FixedOffset::east_opt(SGT_OFFSET_SECS)
        .map_or_else(|| utc.fixed_offset(), |tz| utc.with_timezone(&tz))
}

/// Annotates `eatery`. A live `open_now` is computed from the opening
/// periods when the document has them; otherwise the stored flag is kept.
pub(super) fn eatery_item(eatery: &Eatery, now: &DateTime<FixedOffset>) -> EateryItem {
    let weekday = u8::try_from(now.weekday().num_days_from_sunday()).unwrap_or(0);
    let mut annotated = eatery.clone();
    if let Some(details) = &eatery.opening_hours_details {
        annotated.open_now = Some(is_open_now(details, now));
    }

    EateryItem {
        crowd_favorite: is_crowd_favorite(eatery),
        top_dishes: top_dishes(eatery).into_iter().map(str::to_owned).collect(),
        todays_hours: eatery
            .hours
            .as_deref()
            .map_or(HOURS_NOT_AVAILABLE, |h| todays_hours(h, weekday))
            .to_owned(),
        eatery: annotated,
    }
}

/// Absent `lat` and `lng` mean the caller has no location; that is not an
/// error. Half a pair or an out-of-range pair is.
pub(super) fn reference_point(
    lat: Option<f64>,
    lng: Option<f64>,
) -> Result<Option<GeoPoint>, &'static str> {
    match (lat, lng) {
        (None, None) => Ok(None),
        (Some(lat), Some(lng)) => {
            let point = GeoPoint::new(lat, lng);
            if point.is_valid() {
                Ok(Some(point))
            } else {
                Err("lat must be within [-90, 90] and lng within [-180, 180]")
            }
        }
        _ => Err("lat and lng must be supplied together"),
    }
}

pub(super) async fn list_malls(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MallListQuery>,
) -> Result<Json<ApiResponse<Vec<MallItem>>>, ApiError> {
    let malls = state
        .malls
        .fetch_malls()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    let data = filter_malls(
        &malls,
        query.region.as_deref(),
        query.q.as_deref().unwrap_or_default(),
    )
    .into_iter()
    .map(MallItem::from)
    .collect();

    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(super) async fn nearest_mall(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<ApiResponse<Option<NearestMallItem>>>, ApiError> {
    let reference = reference_point(query.lat, query.lng)
        .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?;
    let Some(reference) = reference else {
        return Ok(Json(ApiResponse::new(None, req_id.0)));
    };

    let malls = state
        .malls
        .fetch_malls()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    let candidates = filter_malls(&malls, None, query.q.as_deref().unwrap_or_default());
    let data = select_nearest(&candidates, reference).map(|ranked| NearestMallItem {
        mall: MallItem::from(*ranked.entity),
        distance_meters: ranked.distance_meters,
    });
    if data.is_none() {
        tracing::info!(
            malls = malls.len(),
            candidates = candidates.len(),
            "no matching mall has usable coordinates"
        );
    }

    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(super) async fn get_mall(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(mall_id): Path<String>,
    Query(query): Query<MallDetailQuery>,
) -> Result<Json<ApiResponse<MallDetail>>, ApiError> {
    let min_rating = query.min_rating.unwrap_or(0.0);
    if !min_rating.is_finite() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "min_rating must be a finite number",
        ));
    }

    let mall = state
        .malls
        .fetch_mall(&mall_id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("mall {mall_id} not found"),
            )
        })?;

    let filter = EateryFilter {
        halal_only: query.halal_only.unwrap_or(false),
        cuisine: query.cuisine,
        min_rating,
    };
    let now = singapore_now();

    let data = MallDetail {
        mall: MallItem::from(&mall),
        cuisines: unique_cuisines(&mall.eateries)
            .into_iter()
            .map(str::to_owned)
            .collect(),
        featured_eatery: featured_eatery(&mall).map(|e| eatery_item(e, &now)),
        eateries: filter
            .apply(&mall.eateries)
            .into_iter()
            .map(|e| eatery_item(e, &now))
            .collect(),
    };

    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(super) async fn search_suggestions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<ApiResponse<Vec<Suggestion>>>, ApiError> {
    let term = query.q.as_deref().unwrap_or_default().trim();
    if term.is_empty() {
        return Ok(Json(ApiResponse::new(Vec::new(), req_id.0)));
    }

    let malls = state
        .malls
        .fetch_malls()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(suggestions(&malls, term), req_id.0)))
}
