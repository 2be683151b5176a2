//! HTTP client for the Firestore REST API (read-only).
//!
//! Only the two calls the app needs are wrapped: listing a collection and
//! fetching one document by id. Listing follows `nextPageToken` cursors.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::value::decode_fields;

const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1/";

/// A decoded document: its id (last segment of the resource name) and its
/// fields as plain JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl RawDocument {
    fn decode(self) -> Result<Document, StoreError> {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        let data = decode_fields(&self.fields)?;
        Ok(Document { id, data })
    }
}

/// Read-only handle on one Firestore database.
///
/// Construct it once at process start and pass it to whatever needs it.
pub struct FirestoreClient {
    client: Client,
    /// `.../projects/{project}/databases/(default)/documents/`
    documents_url: Url,
    api_key: Option<String>,
}

impl FirestoreClient {
    /// Creates a client for `project_id` on the public Firestore endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        project_id: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StoreError> {
        Self::with_base_url(project_id, api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom API root (for the emulator or tests).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`StoreError::InvalidBaseUrl`] if `base_url` cannot hold a path.
    pub fn with_base_url(
        project_id: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let invalid = |reason: String| StoreError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason,
        };

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let mut documents_url = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
        documents_url
            .path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(["projects", project_id, "databases", "(default)", "documents", ""]);

        Ok(Self {
            client,
            documents_url,
            api_key: api_key.map(str::to_owned),
        })
    }

    /// Lists every document in `collection`, following page cursors.
    ///
    /// **All-or-nothing semantics**: a failure on any page discards the
    /// documents already collected.
    ///
    /// # Errors
    ///
    /// - [`StoreError::PaginationLimit`] if more than `max_pages` pages are needed.
    /// - [`StoreError::UnexpectedStatus`] for any non-2xx response.
    /// - [`StoreError::Http`] on network failure.
    /// - [`StoreError::Deserialize`] / [`StoreError::UnsupportedValue`] if a
    ///   page or document cannot be decoded.
    pub async fn list_documents(
        &self,
        collection: &str,
        page_size: u32,
        max_pages: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let mut documents: Vec<Document> = Vec::new();
        let mut page_token: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > max_pages {
                return Err(StoreError::PaginationLimit {
                    collection: collection.to_owned(),
                    max_pages,
                });
            }

            let mut url = self.collection_url(collection, None)?;
            url.query_pairs_mut()
                .append_pair("pageSize", &page_size.to_string());
            if let Some(token) = &page_token {
                url.query_pairs_mut().append_pair("pageToken", token);
            }

            let body = self.get_json(url.clone()).await?.ok_or_else(|| StoreError::UnexpectedStatus {
                status: StatusCode::NOT_FOUND.as_u16(),
                url: self.redacted(&url),
            })?;
            let page: ListDocumentsResponse =
                serde_json::from_value(body).map_err(|e| StoreError::Deserialize {
                    context: format!("list of collection {collection}, page {page_count}"),
                    source: e,
                })?;

            tracing::debug!(
                collection,
                page = page_count,
                documents = page.documents.len(),
                "fetched document page"
            );

            for raw in page.documents {
                documents.push(raw.decode()?);
            }

            page_token = page.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        tracing::info!(collection, documents = documents.len(), "collection listed");
        Ok(documents)
    }

    /// Fetches one document, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnexpectedStatus`] for any non-2xx response other than 404.
    /// - [`StoreError::Http`] on network failure.
    /// - [`StoreError::Deserialize`] / [`StoreError::UnsupportedValue`] if the
    ///   document cannot be decoded.
    pub async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let url = self.collection_url(collection, Some(id))?;
        let Some(body) = self.get_json(url).await? else {
            return Ok(None);
        };
        let raw: RawDocument = serde_json::from_value(body).map_err(|e| StoreError::Deserialize {
            context: format!("document {collection}/{id}"),
            source: e,
        })?;
        raw.decode().map(Some)
    }

    /// `documents_url` + `collection` (+ `/id`), with the API key attached.
    fn collection_url(&self, collection: &str, id: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.documents_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| StoreError::InvalidBaseUrl {
                base_url: self.documents_url.to_string(),
                reason: "URL cannot be a base".to_owned(),
            })?;
            segments.pop_if_empty().push(collection);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    /// GETs `url` and parses the JSON body. A 404 yields `Ok(None)`.
    async fn get_json(&self, url: Url) -> Result<Option<Value>, StoreError> {
        // reqwest errors carry the request URL, API key included
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| StoreError::Http(e.without_url()))?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let url = self.redacted(&url);
            tracing::warn!(status = status.as_u16(), %url, "document store returned an error response");
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Http(e.without_url()))?;
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| StoreError::Deserialize {
                context: self.redacted(&url),
                source: e,
            })
    }

    /// Renders `url` without the API key so it can go into logs and errors.
    fn redacted(&self, url: &Url) -> String {
        let mut clean = url.clone();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "key")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if pairs.is_empty() {
            clean.set_query(None);
        } else {
            clean.query_pairs_mut().clear().extend_pairs(pairs);
        }
        clean.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str, api_key: Option<&str>) -> FirestoreClient {
        FirestoreClient::with_base_url("where-to-jiak", api_key, 5, "jiak-test/0.1", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn collection_url_builds_documents_path() {
        let client = test_client("https://firestore.googleapis.com/v1", None);
        let url = client.collection_url("malls", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/where-to-jiak/databases/(default)/documents/malls"
        );
    }

    #[test]
    fn collection_url_encodes_document_id_and_appends_key() {
        let client = test_client("https://firestore.googleapis.com/v1/", Some("k123"));
        let url = client.collection_url("malls", Some("a b/c")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://firestore.googleapis.com/v1/projects/where-to-jiak/databases/(default)/documents/malls/a%20b%2Fc?key=k123"
        );
    }

    #[test]
    fn redacted_drops_only_the_key() {
        let client = test_client("https://firestore.googleapis.com/v1/", Some("secret"));
        let mut url = client.collection_url("malls", None).unwrap();
        url.query_pairs_mut().append_pair("pageSize", "300");
        let shown = client.redacted(&url);
        assert!(!shown.contains("secret"));
        assert!(shown.ends_with("malls?pageSize=300"));
    }

    #[test]
    fn raw_document_id_is_last_name_segment() {
        let raw = RawDocument {
            name: "projects/p/databases/(default)/documents/malls/ion-orchard".to_owned(),
            fields: Map::new(),
        };
        let doc = raw.decode().unwrap();
        assert_eq!(doc.id, "ion-orchard");
        assert_eq!(doc.data, Value::Object(Map::new()));
    }
}
