//! HTTP client for the LTA DataMall carpark-availability endpoint.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::CarparkError;
use crate::pagination::{fetch_all, PageLimits};
use crate::types::{CarparkRecord, DatamallResponse};

const DEFAULT_BASE_URL: &str = "https://datamall2.mytransport.sg/ltaodataservice/";
const CARPARK_AVAILABILITY_PATH: &str = "CarParkAvailabilityv2";

/// Client for the DataMall carpark-availability API.
///
/// Built once at start-up and shared; use [`DatamallClient::with_base_url`]
/// to point at a mock server in tests.
pub struct DatamallClient {
    client: Client,
    account_key: String,
    base_url: Url,
}

impl DatamallClient {
    /// Creates a client pointed at the production DataMall API.
    ///
    /// # Errors
    ///
    /// Returns [`CarparkError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(account_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, CarparkError> {
        Self::with_base_url(account_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CarparkError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CarparkError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        account_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, CarparkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `join` appends the endpoint instead
        // of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| CarparkError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            account_key: account_key.to_owned(),
            base_url,
        })
    }

    /// Fetches one page of carpark availability starting at record `offset`.
    ///
    /// # Errors
    ///
    /// - [`CarparkError::UnexpectedStatus`] for any non-2xx response.
    /// - [`CarparkError::Http`] on network or TLS failure.
    /// - [`CarparkError::Deserialize`] if the body is not the expected envelope.
    pub async fn fetch_page(&self, offset: usize) -> Result<Vec<CarparkRecord>, CarparkError> {
        let url = self.page_url(offset)?;

        let response = self
            .client
            .get(url.clone())
            .header("AccountKey", &self.account_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                %url,
                body = %body,
                "DataMall returned an error response"
            );
            return Err(CarparkError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<DatamallResponse<CarparkRecord>>(&body).map_err(|e| {
            CarparkError::Deserialize {
                context: format!("carpark availability page at offset {offset}"),
                source: e,
            }
        })?;

        Ok(parsed.value)
    }

    /// Fetches the full carpark-availability table, page by page.
    ///
    /// # Errors
    ///
    /// See [`fetch_all`].
    pub async fn fetch_all_carparks(
        &self,
        limits: PageLimits,
    ) -> Result<Vec<CarparkRecord>, CarparkError> {
        fetch_all(limits, |offset| self.fetch_page(offset)).await
    }

    /// Builds the paged endpoint URL.
    ///
    /// The query is written by hand because DataMall expects a literal
    /// `$skip` key and `query_pairs_mut` would percent-encode the `$`.
    fn page_url(&self, offset: usize) -> Result<Url, CarparkError> {
        let mut url = self
            .base_url
            .join(CARPARK_AVAILABILITY_PATH)
            .map_err(|e| CarparkError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.set_query(Some(&format!("$skip={offset}")));
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
