//! Domain types and pure logic for the mall-eatery finder.
//!
//! Nothing in this crate performs I/O apart from [`load_app_config`] reading
//! the process environment.

pub mod app_config;
pub mod config;
pub mod featured;
pub mod filters;
pub mod geo;
pub mod hours;
pub mod malls;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{distance_meters, rank_by_distance, select_nearest, GeoPoint, Locatable, Ranked};
pub use malls::{Eatery, Mall};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
