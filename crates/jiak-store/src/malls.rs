//! Typed access to the `malls` collection.

use jiak_core::{AppConfig, Mall};
use serde_json::Value;

use crate::client::{Document, FirestoreClient};
use crate::error::StoreError;

pub const MALLS_COLLECTION: &str = "malls";

/// Reads malls (with their embedded eateries) from the document store.
pub struct MallStore {
    client: FirestoreClient,
    page_size: u32,
    max_pages: usize,
}

impl MallStore {
    #[must_use]
    pub fn new(client: FirestoreClient, page_size: u32, max_pages: usize) -> Self {
        Self {
            client,
            page_size,
            max_pages,
        }
    }

    /// Builds the client and paging limits from the application config.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying client cannot be constructed.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, StoreError> {
        let client = FirestoreClient::with_base_url(
            &config.firestore_project_id,
            config.firestore_api_key.as_deref(),
            config.http_timeout_secs,
            &config.user_agent,
            &config.firestore_base_url,
        )?;
        Ok(Self::new(
            client,
            config.firestore_page_size,
            config.firestore_max_pages,
        ))
    }

    /// Every mall in the collection, in the store's listing order.
    ///
    /// # Errors
    ///
    /// Propagates any [`StoreError`] from listing or decoding.
    pub async fn fetch_malls(&self) -> Result<Vec<Mall>, StoreError> {
        self.client
            .list_documents(MALLS_COLLECTION, self.page_size, self.max_pages)
            .await?
            .into_iter()
            .map(mall_from_document)
            .collect()
    }

    /// One mall by document id, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Propagates any [`StoreError`] from the lookup or decoding.
    pub async fn fetch_mall(&self, id: &str) -> Result<Option<Mall>, StoreError> {
        self.client
            .get_document(MALLS_COLLECTION, id)
            .await?
            .map(mall_from_document)
            .transpose()
    }
}

/// Converts a decoded document into a [`Mall`].
///
/// The document id always wins over an `id` field in the body, and eateries
/// without a `mall_id` inherit the mall's id.
///
/// # Errors
///
/// Returns [`StoreError::Deserialize`] if the body does not fit [`Mall`].
pub fn mall_from_document(doc: Document) -> Result<Mall, StoreError> {
    let Document { id, mut data } = doc;
    if let Value::Object(map) = &mut data {
        map.insert("id".to_owned(), Value::String(id.clone()));
    }

    let mut mall: Mall = serde_json::from_value(data).map_err(|e| StoreError::Deserialize {
        context: format!("mall document {id}"),
        source: e,
    })?;

    for eatery in &mut mall.eateries {
        if eatery.mall_id.is_empty() {
            eatery.mall_id.clone_from(&mall.id);
        }
    }
    Ok(mall)
}
