//! Offset-based pagination.
//!
//! The backing service is asked for fixed-size pages starting at offset 0.
//! A page holding fewer records than the page size (including an empty page)
//! is taken to be the last one. The service never says so explicitly, so a
//! short page that is not really final ends the fetch early.

use std::future::Future;

use crate::error::CarparkError;

/// Page size and the ceiling on the number of pages one fetch may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub page_size: usize,
    /// Guards against a service that keeps returning full pages forever.
    pub max_pages: usize,
}

impl PageLimits {
    /// # Errors
    ///
    /// Returns [`CarparkError::InvalidLimits`] if either value is zero.
    pub fn new(page_size: usize, max_pages: usize) -> Result<Self, CarparkError> {
        if page_size == 0 {
            return Err(CarparkError::InvalidLimits {
                reason: "page_size must be greater than zero".to_owned(),
            });
        }
        if max_pages == 0 {
            return Err(CarparkError::InvalidLimits {
                reason: "max_pages must be greater than zero".to_owned(),
            });
        }
        Ok(Self {
            page_size,
            max_pages,
        })
    }
}

impl Default for PageLimits {
    /// DataMall serves 500 records per call.
    fn default() -> Self {
        Self {
            page_size: 500,
            max_pages: 50,
        }
    }
}

/// Fetches every page from `fetch_page` and concatenates the records in
/// arrival order.
///
/// `fetch_page` receives the offset of the first record wanted. Pages are
/// requested strictly one after another. Nothing is cached between calls.
///
/// **All-or-nothing semantics**: if any page fails, the records gathered so
/// far are dropped and the error is returned wrapped in
/// [`CarparkError::PageFetch`] with the failing offset. No retry is attempted.
///
/// # Errors
///
/// - [`CarparkError::PageFetch`] if any page request fails.
/// - [`CarparkError::PaginationLimit`] if `limits.max_pages` full pages have
///   been consumed and the source still has more.
pub async fn fetch_all<R, F, Fut>(limits: PageLimits, mut fetch_page: F) -> Result<Vec<R>, CarparkError>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<Vec<R>, CarparkError>>,
{
    let mut records: Vec<R> = Vec::new();
    let mut offset = 0usize;
    let mut page_count = 0usize;

    loop {
        page_count += 1;
        if page_count > limits.max_pages {
            tracing::warn!(
                max_pages = limits.max_pages,
                records = records.len(),
                "pagination ceiling reached, abandoning fetch"
            );
            return Err(CarparkError::PaginationLimit {
                max_pages: limits.max_pages,
                records_fetched: records.len(),
            });
        }

        let page = fetch_page(offset)
            .await
            .map_err(|source| CarparkError::PageFetch {
                offset,
                source: Box::new(source),
            })?;

        let page_len = page.len();
        tracing::debug!(offset, page = page_count, records = page_len, "fetched page");
        records.extend(page);

        if page_len < limits.page_size {
            break;
        }
        if page_len > limits.page_size {
            tracing::warn!(
                offset,
                page_len,
                page_size = limits.page_size,
                "page larger than requested size; offsets may overlap"
            );
        }
        offset += limits.page_size;
    }

    tracing::info!(pages = page_count, records = records.len(), "pagination complete");
    Ok(records)
}
