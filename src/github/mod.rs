//! Paginated GitHub REST fetching
//!
//! [`transport`] speaks HTTP; [`client`] owns authentication and the mapping
//! from responses to errors; [`paginate`] walks list endpoints with retry,
//! throttling, and stop conditions.

pub mod client;
pub mod error;
pub mod paginate;
pub mod transport;

pub use client::{
    FetchConfig, GithubClient, Page, DEFAULT_API_ROOT, DEFAULT_PAGE_SIZE, DEFAULT_THROTTLE,
    DEFAULT_TIMEOUT, PAGE_CEILING, TOKEN_ENV_VAR,
};
pub use error::{FetchError, PaginationError};
pub use paginate::{PageSet, RetryPolicy};
pub use transport::{RawResponse, Transport, TransportError, UreqTransport};
