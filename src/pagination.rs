//! Lazy iteration over paginated list endpoints.

use crate::client::{join_url, ApiResponse, Client};
use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::VecDeque;

/// Pagination metadata read from a page body. Everything else in the body
/// is left for the caller to decode.
#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(default)]
    next: Option<String>,
}

/// The request that will produce the next page.
#[derive(Debug)]
enum PageRequest {
    /// The caller-supplied path and query parameters, used once.
    First {
        path: String,
        params: Vec<(String, String)>,
    },
    /// A `next` locator from the previous page, fetched verbatim.
    Locator(String),
}

/// Iterator over the pages of a list endpoint.
///
/// Each call to [`next_page`](Self::next_page) issues exactly one GET
/// request: the first for the caller-supplied path and parameters, every
/// later one for the `next` locator found in the previous page's body. The
/// locator is treated as opaque - it is never merged with the original
/// parameters, which the server already encoded into it. Iteration ends
/// when a page carries no `next` value; after that no further requests are
/// issued.
///
/// Pages are fetched on demand, so abandoning the iterator early means
/// later pages are never requested. The iterator is not restartable - call
/// `paginate` again to traverse from the first page.
///
/// Responses are yielded whatever their status; callers inspect
/// [`ApiResponse::status`] themselves.
#[derive(Debug)]
pub struct PageIterator {
    client: Client,
    base: String,
    next: Option<PageRequest>,
}

impl PageIterator {
    pub(crate) fn new(
        client: Client,
        base: String,
        path: String,
        params: Vec<(String, String)>,
    ) -> Self {
        Self {
            client,
            base,
            next: Some(PageRequest::First { path, params }),
        }
    }

    /// Whether iteration has terminated.
    ///
    /// Once exhausted, [`next_page`](Self::next_page) returns `Ok(None)`
    /// without touching the network.
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the previous page carried no `next` value.
    /// Transport failures and bodies whose pagination metadata cannot be
    /// decoded surface here, on the page access that triggered them; the
    /// iterator is exhausted afterwards.
    pub async fn next_page(&mut self) -> Result<Option<ApiResponse>, ApiError> {
        let request = match self.next.take() {
            Some(request) => request,
            None => return Ok(None),
        };

        let response = match &request {
            PageRequest::First { path, params } => {
                let url = join_url(&self.base, path);
                self.client.get_raw(&url, params).await?
            }
            PageRequest::Locator(locator) => {
                let url = join_url(&self.base, locator);
                self.client.get_raw(&url, &[]).await?
            }
        };

        // Decode the cursor before handing the page over; a body that is
        // not JSON fails the access that fetched it, not a later one.
        let meta: PageMeta = serde_json::from_slice(response.bytes())?;
        self.next = meta.next.map(PageRequest::Locator);

        Ok(Some(response))
    }
}

/// The standard shape of a v2 list page.
#[derive(Debug, Deserialize)]
struct PageBody<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// Lazily yields the items of the `results` arrays across all pages.
///
/// Items are buffered one page at a time; the next page is only requested
/// once the current page's items are drained. Unlike [`PageIterator`],
/// this typed adapter treats non-success statuses as errors.
#[derive(Debug)]
pub struct Results<T> {
    pages: PageIterator,
    buffer: VecDeque<T>,
}

impl<T: DeserializeOwned> Results<T> {
    pub(crate) fn new(pages: PageIterator) -> Self {
        Self {
            pages,
            buffer: VecDeque::new(),
        }
    }

    /// Fetch the next item, requesting further pages as needed.
    ///
    /// Returns `Ok(None)` after the last page's items are drained.
    pub async fn next_item(&mut self) -> Result<Option<T>, ApiError> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }

            let page = match self.pages.next_page().await? {
                Some(page) => page,
                None => return Ok(None),
            };
            let page = page.error_for_status()?;

            let body: PageBody<T> = page.json()?;
            self.buffer.extend(body.results);
            // An empty page with a next cursor just advances the loop
        }
    }

    /// Drain the remaining items into a vector.
    ///
    /// Fetches every remaining page; prefer [`next_item`](Self::next_item)
    /// when the traversal may stop early.
    pub async fn collect(mut self) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        while let Some(item) = self.next_item().await? {
            items.push(item);
        }
        Ok(items)
    }
}

// Note: no futures::Stream or std::iter::Iterator impls here - fetches are
// async, so callers drive iteration with next_page()/next_item() in a loop.
