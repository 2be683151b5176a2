//! Mall, eatery, search and featured-pick commands.
//!
//! Every command reads the whole `malls` collection (or one document) fresh
//! from the store and prints its result as pretty JSON.

use jiak_core::featured::{hidden_gems, pick_featured, spot_of_the_day};
use jiak_core::filters::{find_eatery, suggestions, EateryFilter};
use jiak_core::{select_nearest, Eatery, GeoPoint, Mall};
use jiak_store::MallStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::print_json;

#[derive(Debug, Serialize)]
pub(crate) struct Featured<'a> {
    pub hidden_gem: Option<EateryWithMall<'a>>,
    pub spot_of_the_day: Option<&'a Mall>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EateryWithMall<'a> {
    #[serde(flatten)]
    pub eatery: &'a Eatery,
    pub mall_name: &'a str,
}

/// Copy of `mall` whose eatery list keeps only what `filter` accepts.
pub(crate) fn filtered_mall(mall: &Mall, filter: &EateryFilter) -> Mall {
    Mall {
        eateries: filter.apply(&mall.eateries).into_iter().cloned().collect(),
        ..mall.clone()
    }
}

pub(crate) fn featured_picks<'a>(
    malls: &'a [Mall],
    region: Option<&str>,
    seed: Option<u64>,
) -> Featured<'a> {
    let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let gems = hidden_gems(malls);
    Featured {
        hidden_gem: pick_featured(&gems, &mut rng).map(|&(mall, eatery)| EateryWithMall {
            eatery,
            mall_name: &mall.name,
        }),
        spot_of_the_day: spot_of_the_day(malls, region, &mut rng),
    }
}

pub(crate) async fn run_nearest(store: &MallStore, lat: f64, lng: f64) -> anyhow::Result<()> {
    let reference = GeoPoint::new(lat, lng);
    if !reference.is_valid() {
        anyhow::bail!("lat must be within [-90, 90] and lng within [-180, 180]");
    }

    let malls = store.fetch_malls().await?;
    let nearest = select_nearest(&malls, reference);
    if nearest.is_none() {
        tracing::warn!(malls = malls.len(), "no mall has usable coordinates");
    }
    print_json(&nearest)
}

pub(crate) async fn run_mall(
    store: &MallStore,
    id: &str,
    halal_only: bool,
    cuisine: Option<String>,
    min_rating: f64,
) -> anyhow::Result<()> {
    let Some(mall) = store.fetch_mall(id).await? else {
        anyhow::bail!("mall {id} not found");
    };
    let filter = EateryFilter {
        halal_only,
        cuisine,
        min_rating,
    };
    print_json(&filtered_mall(&mall, &filter))
}

pub(crate) async fn run_eatery(store: &MallStore, id: &str) -> anyhow::Result<()> {
    let malls = store.fetch_malls().await?;
    let Some((mall, eatery)) = find_eatery(&malls, id) else {
        anyhow::bail!("eatery {id} not found");
    };
    print_json(&EateryWithMall {
        eatery,
        mall_name: &mall.name,
    })
}

pub(crate) async fn run_search(store: &MallStore, term: &str) -> anyhow::Result<()> {
    let malls = store.fetch_malls().await?;
    print_json(&suggestions(&malls, term.trim()))
}

pub(crate) async fn run_featured(
    store: &MallStore,
    region: Option<&str>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let malls = store.fetch_malls().await?;
    print_json(&featured_picks(&malls, region, seed))
}
