//! Fetch failure taxonomy
//!
//! [`FetchError`] classifies what went wrong with a single page request;
//! [`PaginationError`] wraps a terminal failure together with everything
//! fetched before it, so callers can choose to salvage partial data.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::paginate::PageSet;

/// Why a single page request failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server signalled quota exhaustion. Never retried: waiting out a
    /// rate-limit window is a caller decision, not a backoff loop's.
    #[error("rate limit exhausted{}", fmt_reset(.reset))]
    RateLimited { reset: Option<DateTime<Utc>> },

    /// The request failed below the HTTP layer or with a server-side 5xx.
    /// Retried up to the configured budget.
    #[error("transient failure: {detail}")]
    Transient { detail: String },

    /// The body was not the JSON list this endpoint promises. Not retried;
    /// a confused endpoint does not get better on the second try.
    #[error("malformed response: {detail}")]
    Malformed { detail: String },

    /// Any other HTTP status with no defined meaning here (401, 403 without
    /// quota exhaustion, 410, ...). Not retried.
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },
}

impl FetchError {
    /// Only transient failures are eligible for retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient { .. })
    }
}

fn fmt_reset(reset: &Option<DateTime<Utc>>) -> String {
    match reset {
        Some(at) => format!(" (resets {})", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => String::new(),
    }
}

/// A pagination run that stopped on an error. Carries the pages that did
/// succeed; [`PaginationError::into_partial`] salvages them.
#[derive(Debug)]
pub struct PaginationError {
    /// Endpoint path being walked, e.g. `repos/owner/name/issues`.
    pub endpoint: String,
    /// 1-based page whose fetch failed.
    pub page: u32,
    /// Everything accumulated before the failure.
    pub partial: PageSet,
    pub source: FetchError,
}

impl PaginationError {
    /// Give up on the error and keep what was fetched.
    pub fn into_partial(self) -> PageSet {
        self.partial
    }
}

impl fmt::Display for PaginationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetching {} stopped at page {}: {} ({} items from {} pages kept)",
            self.endpoint,
            self.page,
            self.source,
            self.partial.items.len(),
            self.partial.pages_fetched
        )
    }
}

impl std::error::Error for PaginationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
