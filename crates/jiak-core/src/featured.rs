//! Random "of the day" picks.
//!
//! Every pick is a uniform choice over the candidate set using a
//! caller-supplied RNG. Seed a [`rand::rngs::StdRng`] for reproducible
//! output; pass `rand::rng()` otherwise.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::filters::filter_malls;
use crate::malls::{Eatery, Mall};

/// Every eatery flagged as a hidden gem, paired with the mall that lists it,
/// in mall order.
#[must_use]
pub fn hidden_gems(malls: &[Mall]) -> Vec<(&Mall, &Eatery)> {
    malls
        .iter()
        .flat_map(|m| m.eateries.iter().filter(|e| e.hidden_gem).map(move |e| (m, e)))
        .collect()
}

/// Uniformly picks one candidate, or `None` when there are none.
pub fn pick_featured<'a, T, R>(candidates: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    candidates.choose(rng)
}

/// Random mall within `region` (`None` or `"All"` for any region).
pub fn spot_of_the_day<'a, R>(malls: &'a [Mall], region: Option<&str>, rng: &mut R) -> Option<&'a Mall>
where
    R: Rng + ?Sized,
{
    let candidates = filter_malls(malls, region, "");
    pick_featured(&candidates, rng).copied()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn gem_mall(id: &str, region: &str, gems: &[&str]) -> Mall {
        Mall {
            id: id.to_owned(),
            name: id.to_uppercase(),
            region: Some(region.to_owned()),
            eateries: gems
                .iter()
                .map(|g| Eatery {
                    id: (*g).to_owned(),
                    hidden_gem: !g.starts_with("plain"),
                    ..Eatery::default()
                })
                .collect(),
            ..Mall::default()
        }
    }

    fn malls() -> Vec<Mall> {
        vec![
            gem_mall("north-point", "North", &["g1", "plain-1"]),
            gem_mall("bedok-mall", "East", &["g2", "g3"]),
            gem_mall("causeway", "North", &[]),
        ]
    }

    #[test]
    fn hidden_gems_are_collected_in_mall_order() {
        let malls = malls();
        let gems: Vec<(&str, &str)> = hidden_gems(&malls)
            .iter()
            .map(|(m, e)| (m.id.as_str(), e.id.as_str()))
            .collect();
        assert_eq!(
            gems,
            [("north-point", "g1"), ("bedok-mall", "g2"), ("bedok-mall", "g3")]
        );
    }

    #[test]
    fn gem_is_paired_with_listing_mall_not_its_mall_id() {
        let mut malls = malls();
        malls[1].eateries[0].mall_id = "elsewhere".to_owned();
        let gems = hidden_gems(&malls);
        let (mall, gem) = gems[1];
        assert_eq!(gem.id, "g2");
        assert_eq!(mall.name, "BEDOK-MALL");
    }

    #[test]
    fn pick_from_empty_is_none() {
        let none: Vec<u8> = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_featured(&none, &mut rng).is_none());
    }

    #[test]
    fn same_seed_gives_same_pick() {
        let malls = malls();
        let gems = hidden_gems(&malls);
        let first = pick_featured(&gems, &mut StdRng::seed_from_u64(42)).map(|(_, e)| e.id.clone());
        for _ in 0..5 {
            let again =
                pick_featured(&gems, &mut StdRng::seed_from_u64(42)).map(|(_, e)| e.id.clone());
            assert_eq!(first, again);
        }
    }

    #[test]
    fn every_candidate_is_reachable() {
        let items = [1, 2, 3];
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let pick = pick_featured(&items, &mut rng).copied().unwrap_or_default();
            seen[pick - 1] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn spot_of_the_day_respects_region() {
        let malls = malls();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let spot = spot_of_the_day(&malls, Some("North"), &mut rng).expect("north has malls");
            assert_eq!(spot.region.as_deref(), Some("North"));
        }
        assert!(spot_of_the_day(&malls, Some("West"), &mut rng).is_none());
    }
}
