//! Mall and eatery records as stored in the `malls` document collection.
//!
//! Documents are hand-curated, so most fields are optional and the decoder
//! is forgiving: missing strings become empty, missing flags become `false`,
//! and a coordinate component that is not a number is treated as absent.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::{usable_point, GeoPoint, Locatable};
use crate::hours::OpeningHoursDetails;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lng: Option<f64>,
}

impl Coordinates {
    #[must_use]
    pub fn point(&self) -> Option<GeoPoint> {
        usable_point(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mall {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Street address, shown under the mall name.
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub stars: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<u64>,
    #[serde(default)]
    pub business_status: Option<String>,
    #[serde(default)]
    pub google_maps_url: Option<String>,
    #[serde(default)]
    pub eateries: Vec<Eatery>,
}

impl Locatable for Mall {
    fn coordinates(&self) -> Option<GeoPoint> {
        self.coordinates.as_ref().and_then(Coordinates::point)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    #[serde(default)]
    pub one_liner: String,
    #[serde(default)]
    pub common_themes: String,
    #[serde(default)]
    pub most_mentioned: String,
    #[serde(default)]
    pub biggest_complaint: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Eatery {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mall_id: String,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub cuisine_type: String,
    #[serde(default)]
    pub halal: bool,
    #[serde(default)]
    pub open_now: Option<bool>,
    /// Weekday text lines, Monday first.
    #[serde(default)]
    pub hours: Option<Vec<String>>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<u64>,
    #[serde(default)]
    pub location: Option<Coordinates>,
    #[serde(default)]
    pub summary: Option<ReviewSummary>,
    #[serde(default)]
    pub image_gallery: Option<Vec<String>>,
    #[serde(default)]
    pub opening_hours_details: Option<OpeningHoursDetails>,
    #[serde(default)]
    pub hidden_gem: bool,
    #[serde(default)]
    pub hidden_gem_blog: Option<String>,
}

impl Locatable for Eatery {
    fn coordinates(&self) -> Option<GeoPoint> {
        self.location.as_ref().and_then(Coordinates::point)
    }
}

/// Accepts any JSON value and keeps it only if it is a number.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Number(f64),
        Other(IgnoredAny),
    }

    Ok(match Option::<Lenient>::deserialize(deserializer)? {
        Some(Lenient::Number(v)) => Some(v),
        Some(Lenient::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mall_decodes_with_minimal_fields() {
        let mall: Mall = serde_json::from_value(json!({ "name": "ION Orchard" })).unwrap();
        assert_eq!(mall.name, "ION Orchard");
        assert!(mall.eateries.is_empty());
        assert!(mall.coordinates().is_none());
    }

    #[test]
    fn mall_coordinates_with_null_component_are_unusable() {
        let mall: Mall = serde_json::from_value(json!({
            "name": "Somewhere",
            "coordinates": { "lat": null, "lng": 103.8 }
        }))
        .unwrap();
        assert!(mall.coordinates.is_some());
        assert!(mall.coordinates().is_none());
    }

    #[test]
    fn non_numeric_coordinate_is_treated_as_absent() {
        let mall: Mall = serde_json::from_value(json!({
            "name": "Typo Mall",
            "coordinates": { "lat": "1.30", "lng": 103.8 }
        }))
        .unwrap();
        assert_eq!(mall.coordinates.as_ref().and_then(|c| c.lat), None);
        assert!(mall.coordinates().is_none());
    }

    #[test]
    fn integer_coordinates_are_accepted() {
        let mall: Mall = serde_json::from_value(json!({
            "name": "Grid Mall",
            "coordinates": { "lat": 1, "lng": 103 }
        }))
        .unwrap();
        assert_eq!(mall.coordinates(), Some(GeoPoint::new(1.0, 103.0)));
    }

    #[test]
    fn eatery_defaults_flags_and_uses_location_for_position() {
        let eatery: Eatery = serde_json::from_value(json!({
            "id": "place-1",
            "name": "Kopi Corner",
            "location": { "lat": 1.3, "lng": 103.85 }
        }))
        .unwrap();
        assert!(!eatery.halal);
        assert!(!eatery.hidden_gem);
        assert_eq!(eatery.cuisine_type, "");
        assert_eq!(eatery.coordinates(), Some(GeoPoint::new(1.3, 103.85)));
    }
}
