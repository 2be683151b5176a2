pub mod client;
pub mod error;
pub mod pagination;
pub mod types;

pub use client::DatamallClient;
pub use error::CarparkError;
pub use pagination::{fetch_all, PageLimits};
pub use types::CarparkRecord;
