use thiserror::Error;

#[derive(Debug, Error)]
pub enum CarparkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    /// A page request failed; everything fetched before it was discarded.
    #[error("page fetch failed at offset {offset}: {source}")]
    PageFetch {
        offset: usize,
        #[source]
        source: Box<CarparkError>,
    },

    #[error("pagination limit reached: exceeded {max_pages} pages ({records_fetched} records fetched)")]
    PaginationLimit {
        max_pages: usize,
        records_fetched: usize,
    },

    #[error("invalid page limits: {reason}")]
    InvalidLimits { reason: String },
}

impl CarparkError {
    /// Offset of the page that failed, when the error came out of a paginated fetch.
    #[must_use]
    pub fn failed_offset(&self) -> Option<usize> {
        match self {
            CarparkError::PageFetch { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
