//! Read-only access to the document store holding malls and eateries.

pub mod client;
pub mod error;
pub mod malls;
pub mod value;

pub use client::{Document, FirestoreClient};
pub use error::StoreError;
pub use malls::{mall_from_document, MallStore, MALLS_COLLECTION};
