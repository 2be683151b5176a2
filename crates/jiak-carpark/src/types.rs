//! LTA DataMall response types for the `CarParkAvailabilityv2` endpoint.
//!
//! The endpoint wraps records in an OData envelope:
//!
//! ```text
//! { "odata.metadata": "...", "value": [ { "CarParkID": "1", ... }, ... ] }
//! ```
//!
//! `Location` is a single string holding `"<lat> <lng>"`, empty for some
//! HDB carparks.

use serde::{Deserialize, Serialize};

/// OData envelope returned by every DataMall endpoint.
#[derive(Debug, Deserialize)]
pub struct DatamallResponse<T> {
    #[serde(rename = "odata.metadata", default)]
    pub metadata: Option<String>,
    pub value: Vec<T>,
}

/// One row of carpark availability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarparkRecord {
    #[serde(rename = "CarParkID")]
    pub carpark_id: String,

    /// `"Marina"`, `"Orchard"`, ... ; empty for HDB and URA carparks.
    #[serde(rename = "Area", default)]
    pub area: String,

    /// Building or development name, e.g. `"Suntec City"`.
    #[serde(rename = "Development", default)]
    pub development: String,

    #[serde(rename = "Location", default)]
    pub location: String,

    #[serde(rename = "AvailableLots", default)]
    pub available_lots: i64,

    /// `C` (cars), `H` (heavy vehicles) or `Y` (motorcycles).
    #[serde(rename = "LotType", default)]
    pub lot_type: String,

    /// `HDB`, `LTA` or `URA`.
    #[serde(rename = "Agency", default)]
    pub agency: String,
}

impl CarparkRecord {
    /// Case-insensitive substring match on the development name.
    /// A blank term matches every record.
    #[must_use]
    pub fn matches_development(&self, term: &str) -> bool {
        let term = term.trim();
        term.is_empty()
            || self
                .development
                .to_lowercase()
                .contains(&term.to_lowercase())
    }

    /// Parses `Location` into `(lat, lng)`.
    #[must_use]
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        let mut parts = self.location.split_whitespace();
        let lat = parts.next()?.parse::<f64>().ok()?;
        let lng = parts.next()?.parse::<f64>().ok()?;
        Some((lat, lng))
    }
}
