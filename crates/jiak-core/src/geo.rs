//! Great-circle distance and nearest-entity ranking.
//!
//! Entities opt in through [`Locatable`]; anything without a usable
//! coordinate pair is left out of the ranking rather than reported as an
//! error. Callers that could not obtain a reference point (geolocation
//! declined or unavailable) should skip ranking entirely and treat the
//! outcome as "no selection".

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` when both components are finite and within the
    /// latitude/longitude ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Haversine distance between two points, in meters.
///
/// No range validation is performed: out-of-range input still produces a
/// deterministic number, it just does not mean much.
#[must_use]
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Anything that may carry a geographic position.
pub trait Locatable {
    /// The entity's position, or `None` when it has no usable coordinate pair.
    fn coordinates(&self) -> Option<GeoPoint>;
}

impl Locatable for GeoPoint {
    fn coordinates(&self) -> Option<GeoPoint> {
        Some(*self)
    }
}

impl<T: Locatable + ?Sized> Locatable for &T {
    fn coordinates(&self) -> Option<GeoPoint> {
        (**self).coordinates()
    }
}

/// Builds a point from two optional components, rejecting absent or
/// non-finite values.
#[must_use]
pub fn usable_point(lat: Option<f64>, lng: Option<f64>) -> Option<GeoPoint> {
    match (lat, lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
            Some(GeoPoint::new(lat, lng))
        }
        _ => None,
    }
}

/// An entity paired with its distance from a reference point.
///
/// Borrowed from the caller's collection; the entity itself is never touched.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Ranked<'a, T> {
    #[serde(flatten)]
    pub entity: &'a T,
    pub distance_meters: f64,
}

/// Ranks every locatable entity by ascending distance from `reference`.
///
/// Entities without coordinates are dropped. Equal distances keep their
/// input order (`sort_by` is stable).
#[must_use]
pub fn rank_by_distance<T: Locatable>(entities: &[T], reference: GeoPoint) -> Vec<Ranked<'_, T>> {
    let mut ranked: Vec<Ranked<'_, T>> = entities
        .iter()
        .filter_map(|entity| {
            entity.coordinates().map(|point| Ranked {
                entity,
                distance_meters: distance_meters(reference, point),
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    ranked
}

/// Returns the entity closest to `reference`, or `None` when no entity has
/// usable coordinates.
#[must_use]
pub fn select_nearest<T: Locatable>(entities: &[T], reference: GeoPoint) -> Option<Ranked<'_, T>> {
    rank_by_distance(entities, reference).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Place {
        name: &'static str,
        point: Option<GeoPoint>,
    }

    impl Locatable for Place {
        fn coordinates(&self) -> Option<GeoPoint> {
            self.point.filter(|p| p.lat.is_finite() && p.lng.is_finite())
        }
    }

    fn place(name: &'static str, point: Option<GeoPoint>) -> Place {
        Place { name, point }
    }

    /// Point `meters` due north of `origin`.
    fn north_of(origin: GeoPoint, meters: f64) -> GeoPoint {
        let d_lat = (meters / EARTH_RADIUS_M).to_degrees();
        GeoPoint::new(origin.lat + d_lat, origin.lng)
    }

    const ORCHARD: GeoPoint = GeoPoint::new(1.3040, 103.8318);
    const JURONG: GeoPoint = GeoPoint::new(1.3331, 103.7404);

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(distance_meters(ORCHARD, ORCHARD), 0.0);
        assert_eq!(distance_meters(JURONG, JURONG), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_meters(ORCHARD, JURONG);
        let ba = distance_meters(JURONG, ORCHARD);
        assert!((ab - ba).abs() <= ab * 1e-6, "ab={ab} ba={ba}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let expected = EARTH_RADIUS_M * 1.0_f64.to_radians();
        let d = distance_meters(a, b);
        assert!((d - expected).abs() < 1.0, "got {d}, expected {expected}");
        assert!((d - 111_195.0).abs() < 1.0, "got {d}");
    }

    #[test]
    fn distance_is_never_negative() {
        let pairs = [
            (GeoPoint::new(-89.9, -179.9), GeoPoint::new(89.9, 179.9)),
            (GeoPoint::new(0.0, 180.0), GeoPoint::new(0.0, -180.0)),
            (ORCHARD, JURONG),
        ];
        for (a, b) in pairs {
            assert!(distance_meters(a, b) >= 0.0);
        }
    }

    #[test]
    fn out_of_range_input_is_still_deterministic() {
        let a = GeoPoint::new(123.0, 400.0);
        let b = GeoPoint::new(-95.0, -200.0);
        assert_eq!(distance_meters(a, b), distance_meters(a, b));
        assert!(!a.is_valid());
    }

    #[test]
    fn select_nearest_on_empty_list_is_none() {
        let places: Vec<Place> = Vec::new();
        assert!(select_nearest(&places, ORCHARD).is_none());
    }

    #[test]
    fn select_nearest_ignores_entities_without_usable_coordinates() {
        let far = GeoPoint::new(1.45, 103.82);
        let places = vec![
            place("no-coords", None),
            place("nan", Some(GeoPoint::new(f64::NAN, 103.8))),
            place("far", Some(far)),
        ];
        let nearest = select_nearest(&places, ORCHARD).expect("one usable entity");
        assert_eq!(nearest.entity.name, "far");
    }

    #[test]
    fn select_nearest_picks_smallest_distance() {
        let places = vec![
            place("500m", Some(north_of(ORCHARD, 500.0))),
            place("100m", Some(north_of(ORCHARD, 100.0))),
            place("900m", Some(north_of(ORCHARD, 900.0))),
        ];
        let nearest = select_nearest(&places, ORCHARD).expect("nearest");
        assert_eq!(nearest.entity.name, "100m");
        assert!((nearest.distance_meters - 100.0).abs() < 0.5);
    }

    #[test]
    fn select_nearest_breaks_ties_by_input_order() {
        let spot = north_of(ORCHARD, 250.0);
        let places = vec![
            place("first", Some(spot)),
            place("second", Some(spot)),
        ];
        for _ in 0..10 {
            let nearest = select_nearest(&places, ORCHARD).expect("nearest");
            assert_eq!(nearest.entity.name, "first");
        }
    }

    #[test]
    fn rank_by_distance_orders_ascending_and_keeps_input_untouched() {
        let places = vec![
            place("b", Some(north_of(ORCHARD, 300.0))),
            place("skip", None),
            place("a", Some(north_of(ORCHARD, 10.0))),
        ];
        let ranked = rank_by_distance(&places, ORCHARD);
        let names: Vec<&str> = ranked.iter().map(|r| r.entity.name).collect();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(places[0].name, "b");
    }

    #[test]
    fn references_rank_like_their_targets() {
        let places = vec![
            place("far", Some(north_of(ORCHARD, 500.0))),
            place("near", Some(north_of(ORCHARD, 50.0))),
            place("nowhere", None),
        ];
        let subset: Vec<&Place> = places.iter().filter(|p| p.name != "near").collect();
        let nearest = select_nearest(&subset, ORCHARD).expect("one usable place");
        assert_eq!(nearest.entity.name, "far");
    }

    #[test]
    fn usable_point_requires_both_finite_components() {
        assert!(usable_point(Some(1.0), Some(2.0)).is_some());
        assert!(usable_point(None, Some(2.0)).is_none());
        assert!(usable_point(Some(1.0), None).is_none());
        assert!(usable_point(Some(f64::INFINITY), Some(2.0)).is_none());
    }

    #[test]
    fn is_valid_checks_ranges() {
        assert!(ORCHARD.is_valid());
        assert!(GeoPoint::new(90.0, -180.0).is_valid());
        assert!(!GeoPoint::new(90.1, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, 180.5).is_valid());
    }
}
