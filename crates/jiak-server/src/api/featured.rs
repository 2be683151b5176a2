use axum::{
    extract::{Query, State},
    Extension, Json,
};
use jiak_core::featured::{hidden_gems, pick_featured, spot_of_the_day};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::malls::{eatery_item, singapore_now, EateryItem, MallItem};
use super::{map_store_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct HiddenGemItem {
    #[serde(flatten)]
    pub eatery: EateryItem,
    pub mall_name: String,
}

#[derive(Debug, Serialize)]
pub(super) struct FeaturedData {
    pub hidden_gem: Option<HiddenGemItem>,
    pub spot_of_the_day: Option<MallItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FeaturedQuery {
    pub region: Option<String>,
    /// Fixes the picks; omitted means fresh entropy per request.
    pub seed: Option<u64>,
}

pub(super) async fn get_featured(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<ApiResponse<FeaturedData>>, ApiError> {
    let malls = state
        .malls
        .fetch_malls()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    let mut rng = query
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let now = singapore_now();

    let gems = hidden_gems(&malls);
    let hidden_gem = pick_featured(&gems, &mut rng).map(|(mall, gem)| HiddenGemItem {
        mall_name: mall.name.clone(),
        eatery: eatery_item(gem, &now),
    });
    let spot_of_the_day =
        spot_of_the_day(&malls, query.region.as_deref(), &mut rng).map(MallItem::from);

    Ok(Json(ApiResponse::new(
        FeaturedData {
            hidden_gem,
            spot_of_the_day,
        },
        req_id.0,
    )))
}
