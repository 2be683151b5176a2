//! In-memory filters and search over malls and their eateries.

use serde::{Deserialize, Serialize};

use crate::malls::{Eatery, Mall};

/// Sentinel used by callers for "no cuisine / region restriction".
pub const ALL: &str = "All";

/// Rating at or above which an eatery with enough reviews is a crowd favorite.
pub const CROWD_FAVORITE_MIN_RATING: f64 = 4.5;
pub const CROWD_FAVORITE_MIN_REVIEWS: u64 = 500;

const PLACEHOLDER_LOGO_MARKERS: &[&str] = &["restaurant-71", "localhost", "default", "placeholder"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EateryFilter {
    #[serde(default)]
    pub halal_only: bool,
    /// `None` or `"All"` disables the cuisine check.
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub min_rating: f64,
}

impl EateryFilter {
    #[must_use]
    pub fn matches(&self, eatery: &Eatery) -> bool {
        let halal = !self.halal_only || eatery.halal;
        let cuisine = match self.cuisine.as_deref() {
            None | Some(ALL) => true,
            Some(c) => eatery.cuisine_type == c,
        };
        let rating = eatery.rating.unwrap_or(0.0) >= self.min_rating;
        halal && cuisine && rating
    }

    #[must_use]
    pub fn apply<'a>(&self, eateries: &'a [Eatery]) -> Vec<&'a Eatery> {
        eateries.iter().filter(|e| self.matches(e)).collect()
    }
}

/// Distinct non-empty cuisine names in first-seen order.
#[must_use]
pub fn unique_cuisines(eateries: &[Eatery]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for eatery in eateries {
        let cuisine = eatery.cuisine_type.as_str();
        if !cuisine.is_empty() && !seen.contains(&cuisine) {
            seen.push(cuisine);
        }
    }
    seen
}

/// Case-insensitive substring match on the mall's name or any eatery name.
/// A blank term matches every mall.
#[must_use]
pub fn mall_matches_search(mall: &Mall, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    mall.name.to_lowercase().contains(&needle)
        || mall
            .eateries
            .iter()
            .any(|e| e.name.to_lowercase().contains(&needle))
}

/// Malls in `region` (all regions when `None` or `"All"`) that match `term`.
#[must_use]
pub fn filter_malls<'a>(malls: &'a [Mall], region: Option<&str>, term: &str) -> Vec<&'a Mall> {
    malls
        .iter()
        .filter(|m| match region {
            None | Some(ALL) => true,
            Some(r) => m.region.as_deref() == Some(r),
        })
        .filter(|m| mall_matches_search(m, term))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Mall,
    Eatery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub name: String,
    pub id: String,
    /// Owning mall's name, set for eatery suggestions.
    pub mall: Option<String>,
    pub mall_id: Option<String>,
}

/// Type-ahead suggestions: each matching mall followed by its matching eateries.
#[must_use]
pub fn suggestions(malls: &[Mall], term: &str) -> Vec<Suggestion> {
    if term.is_empty() {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    let mut out = Vec::new();

    for mall in malls {
        if mall.name.to_lowercase().contains(&needle) {
            out.push(Suggestion {
                kind: SuggestionKind::Mall,
                name: mall.name.clone(),
                id: mall.id.clone(),
                mall: None,
                mall_id: None,
            });
        }
        for eatery in &mall.eateries {
            if eatery.name.to_lowercase().contains(&needle) {
                out.push(Suggestion {
                    kind: SuggestionKind::Eatery,
                    name: eatery.name.clone(),
                    id: eatery.id.clone(),
                    mall: Some(mall.name.clone()),
                    mall_id: Some(mall.id.clone()),
                });
            }
        }
    }
    out
}

/// Looks an eatery up by id across all malls.
#[must_use]
pub fn find_eatery<'a>(malls: &'a [Mall], eatery_id: &str) -> Option<(&'a Mall, &'a Eatery)> {
    malls.iter().find_map(|m| {
        m.eateries
            .iter()
            .find(|e| e.id == eatery_id)
            .map(|e| (m, e))
    })
}

/// The mall's best-rated eatery. Unrated eateries count as 0 and the first
/// one wins a tie.
#[must_use]
pub fn featured_eatery(mall: &Mall) -> Option<&Eatery> {
    let mut best: Option<&Eatery> = None;
    for eatery in &mall.eateries {
        match best {
            Some(b) if eatery.rating.unwrap_or(0.0) <= b.rating.unwrap_or(0.0) => {}
            _ => best = Some(eatery),
        }
    }
    best
}

#[must_use]
pub fn is_crowd_favorite(eatery: &Eatery) -> bool {
    eatery.rating.unwrap_or(0.0) >= CROWD_FAVORITE_MIN_RATING
        && eatery.total_reviews.unwrap_or(0) > CROWD_FAVORITE_MIN_REVIEWS
}

/// Lead-ins the review summariser tends to put before the first dish.
const DISH_LEAD_INS: &[&str] = &[
    "the most mentioned dishes in the reviews are",
    "the most mentioned items are",
    "with specific mentions of",
    "the dishes most mentioned in",
    "the most mentioned dishes are",
    "most frequently mentioned dishes include the",
    "specific dish mentioned is the",
    "most mentioned dishes were the",
    "review mentions the",
    "with a customer claiming it was just",
    "dishes frequently mentioned include the",
    "one-liner summary",
    "most mentioned dishes include",
];

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    s.get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .and_then(|_| s.get(prefix.len()..))
}

/// Cuts one summary entry down to a dish name: drops a known lead-in, stops
/// at the first sentence break, keeps only the first of "x and y" and drops
/// a leading "the".
#[must_use]
pub fn short_dish(entry: &str) -> &str {
    let mut dish = entry.trim();
    if let Some(rest) = DISH_LEAD_INS
        .iter()
        .find_map(|lead| strip_prefix_ignore_case(dish, lead))
    {
        dish = rest.trim();
    }
    if let Some(end) = dish.find(['.', ',']) {
        dish = dish[..end].trim();
    }
    // ASCII lowercasing keeps byte offsets
    if let Some(end) = dish.to_ascii_lowercase().find(" and ") {
        dish = dish[..end].trim();
    }
    if let Some(rest) = strip_prefix_ignore_case(dish, "the ") {
        dish = rest.trim();
    }
    dish
}

/// Short names of the first two entries in the review summary's
/// comma-separated list. Entries that clean up to nothing are dropped, not
/// replaced by later ones.
#[must_use]
pub fn top_dishes(eatery: &Eatery) -> Vec<&str> {
    eatery
        .summary
        .as_ref()
        .map(|s| {
            s.most_mentioned
                .split(',')
                .take(2)
                .map(short_dish)
                .filter(|d| !d.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Whether `url` looks like a real logo rather than a stock placeholder.
#[must_use]
pub fn has_usable_logo(url: Option<&str>) -> bool {
    match url {
        None | Some("") => false,
        Some(u) => !PLACEHOLDER_LOGO_MARKERS.iter().any(|m| u.contains(m)),
    }
}

#[cfg(test)]
#[path = "filters_test.rs"]
mod tests;
