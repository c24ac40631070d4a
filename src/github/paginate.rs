//! Pagination engine
//!
//! Walks a list endpoint page by page, retrying transient failures within a
//! bounded budget and pausing between pages. Stops on the first empty or
//! short page, at the optional caller cap, and unconditionally at
//! [`PAGE_CEILING`].

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::client::{GithubClient, Page, PAGE_CEILING};
use super::error::{FetchError, PaginationError};

/// Bounded retry with linear backoff, applied per page.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per page, the first one included. Never zero.
    pub max_attempts: u32,
    /// The wait before retry `n` (1-based) is `n * base_delay`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self { max_attempts, base_delay }
    }

    /// Backoff after the given failed attempt (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    /// Three attempts, 2s base delay: waits of 2s then 4s.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// Everything one pagination run accumulated.
#[derive(Debug, Default, Clone)]
pub struct PageSet {
    /// Records in arrival order across all fetched pages.
    pub items: Vec<Value>,
    /// Pages fetched successfully, the final short or empty one included.
    pub pages_fetched: u32,
    /// Last remaining-quota figure the server reported.
    pub rate_remaining: Option<u64>,
    /// True when the run stopped at [`PAGE_CEILING`] with data left behind.
    pub hit_ceiling: bool,
}

impl GithubClient {
    /// Fetch every page of `endpoint` until one of the stop conditions
    /// fires. On failure the error carries all pages fetched so far.
    pub fn paginate(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        max_pages: Option<u32>,
    ) -> Result<PageSet, PaginationError> {
        let page_size = self.config().page_size;
        let throttle = self.config().throttle;
        let mut set = PageSet::default();
        let mut page: u32 = 1;
        loop {
            if let Some(cap) = max_pages {
                if page > cap {
                    debug!("page cap {cap} reached for {endpoint}");
                    break;
                }
            }
            if page > PAGE_CEILING {
                warn!("stopping after {PAGE_CEILING} pages of {endpoint}; more data remains");
                set.hit_ceiling = true;
                break;
            }
            match self.fetch_page_with_retry(endpoint, params, page) {
                Ok(fetched) => {
                    let count = fetched.items.len();
                    set.pages_fetched += 1;
                    if fetched.rate_remaining.is_some() {
                        set.rate_remaining = fetched.rate_remaining;
                    }
                    set.items.extend(fetched.items);
                    debug!("fetched page {page} of {endpoint}: {count} items");
                    if count == 0 || (count as u32) < page_size {
                        break;
                    }
                    page += 1;
                    if !throttle.is_zero() {
                        std::thread::sleep(throttle);
                    }
                }
                Err(error) => {
                    return Err(PaginationError {
                        endpoint: endpoint.to_string(),
                        page,
                        partial: set,
                        source: error,
                    });
                }
            }
        }
        Ok(set)
    }

    fn fetch_page_with_retry(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        page: u32,
    ) -> Result<Page, FetchError> {
        let policy = self.config().retry;
        let mut attempt: u32 = 1;
        loop {
            match self.fetch_page(endpoint, params, page) {
                Ok(fetched) => return Ok(fetched),
                Err(error) if error.is_transient() && attempt < policy.max_attempts => {
                    let delay = policy.delay_after(attempt);
                    debug!(
                        "page {page} of {endpoint} failed (attempt {attempt}/{}): {error}; retrying in {delay:?}",
                        policy.max_attempts
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}
