//! GitHub REST client
//!
//! Owns authentication, request construction, and the mapping from raw HTTP
//! responses to [`FetchError`]s. Pagination lives in [`super::paginate`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::FetchError;
use super::paginate::RetryPolicy;
use super::transport::{RawResponse, Transport, UreqTransport};

/// Default API root; override for GitHub Enterprise hosts or test servers.
pub const DEFAULT_API_ROOT: &str = "https://api.github.com";

/// Records requested per page. 100 is the server-side maximum.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Pause after each successful page before the next request is issued,
/// independent of the observed remaining quota.
pub const DEFAULT_THROTTLE: Duration = Duration::from_secs(1);

/// End-to-end timeout for a single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Unconditional stop: no pagination run fetches more pages than this,
/// whatever the server keeps returning.
pub const PAGE_CEILING: u32 = 1000;

/// Environment variable consulted first for the bearer token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Construction-time settings for the fetch engine. Every knob the engine
/// consults is here; nothing reads ambient globals.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Records per page, sent as `per_page` on every request.
    pub page_size: u32,
    /// Pause between consecutive page requests.
    pub throttle: Duration,
    /// Per-request timeout enforced by the transport.
    pub timeout: Duration,
    /// Retry budget applied per page to transient failures.
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            throttle: DEFAULT_THROTTLE,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// One fetched page: parsed records plus the remaining-quota figure the
/// server reported alongside them.
#[derive(Debug)]
pub struct Page {
    pub items: Vec<Value>,
    pub rate_remaining: Option<u64>,
}

/// Client over a pluggable [`Transport`]. Holds the resolved credential for
/// its whole lifetime; construct a new client to pick up a new token.
pub struct GithubClient {
    transport: Box<dyn Transport>,
    api_root: String,
    headers: Vec<(&'static str, String)>,
    config: FetchConfig,
}

impl GithubClient {
    /// Production client over ureq. `api_root` defaults to
    /// [`DEFAULT_API_ROOT`]; `token_file` overrides the default credential
    /// file location, not the `GITHUB_TOKEN` environment variable.
    pub fn new(api_root: Option<&str>, token_file: Option<&Path>, config: FetchConfig) -> Self {
        let transport = Box::new(UreqTransport::new(config.timeout));
        let token = resolve_token(token_file);
        Self::with_transport(transport, api_root, token, config)
    }

    /// Client over an arbitrary transport. Used by tests and anything that
    /// wants to stub the network.
    pub fn with_transport(
        transport: Box<dyn Transport>,
        api_root: Option<&str>,
        token: Option<String>,
        config: FetchConfig,
    ) -> Self {
        let mut headers: Vec<(&'static str, String)> = vec![
            ("accept", "application/vnd.github+json".to_string()),
            ("user-agent", concat!("repo-pulse/", env!("CARGO_PKG_VERSION")).to_string()),
        ];
        match token {
            Some(token) => headers.push(("authorization", format!("Bearer {token}"))),
            None => {
                warn!("no GitHub credential found; unauthenticated requests are limited to 60/hour")
            }
        }
        let api_root = api_root.unwrap_or(DEFAULT_API_ROOT).trim_end_matches('/').to_string();
        Self { transport, api_root, headers, config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch a single page of `endpoint`. `page` is 1-based; `params` are
    /// forwarded verbatim ahead of the pagination parameters.
    pub fn fetch_page(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        page: u32,
    ) -> Result<Page, FetchError> {
        debug_assert!(page >= 1, "pages are 1-based");
        let mut query: Vec<(&str, String)> = Vec::with_capacity(params.len() + 2);
        for (name, value) in params {
            query.push((name, (*value).to_string()));
        }
        query.push(("per_page", self.config.page_size.to_string()));
        query.push(("page", page.to_string()));

        let url = join_url(&self.api_root, endpoint);
        let response = self
            .transport
            .get(&url, &query, &self.headers)
            .map_err(|err| FetchError::Transient { detail: err.to_string() })?;
        interpret(endpoint, response)
    }
}

fn join_url(root: &str, endpoint: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), endpoint.trim_start_matches('/'))
}

/// Resolve the bearer token: `GITHUB_TOKEN` first, then the credential file
/// (default `<config dir>/repo-pulse/token`). Empty values count as unset.
fn resolve_token(token_file: Option<&Path>) -> Option<String> {
    if let Ok(value) = std::env::var(TOKEN_ENV_VAR) {
        let token = value.trim().to_string();
        if !token.is_empty() {
            debug!("using bearer token from ${TOKEN_ENV_VAR}");
            return Some(token);
        }
    }
    let path = token_file.map(Path::to_path_buf).or_else(default_token_file)?;
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let token = contents.trim().to_string();
            if token.is_empty() {
                None
            } else {
                debug!("using bearer token from {}", path.display());
                Some(token)
            }
        }
        Err(_) => None,
    }
}

fn default_token_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("repo-pulse").join("token"))
}

/// Map one raw response to a page or a classified failure.
fn interpret(endpoint: &str, response: RawResponse) -> Result<Page, FetchError> {
    let rate_remaining = header_u64(&response, "x-ratelimit-remaining");
    match response.status {
        status if (200..300).contains(&status) => {
            let items = parse_list(&response.body)?;
            Ok(Page { items, rate_remaining })
        }
        // A missing resource ends the walk; it is not worth failing a whole
        // run over, and the caller cannot distinguish "no such repo" from
        // "nothing there" at this level anyway.
        404 => {
            debug!("GET {endpoint} returned 404; treating as end of data");
            Ok(Page { items: Vec::new(), rate_remaining })
        }
        403 | 429 if rate_remaining == Some(0) => {
            Err(FetchError::RateLimited { reset: header_reset(&response) })
        }
        status if (500..600).contains(&status) => {
            Err(FetchError::Transient { detail: format!("server error {status}") })
        }
        status => Err(FetchError::Status { status }),
    }
}

fn parse_list(body: &str) -> Result<Vec<Value>, FetchError> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|err| FetchError::Malformed { detail: err.to_string() })?;
    match parsed {
        Value::Array(items) => Ok(items),
        other => Err(FetchError::Malformed {
            detail: format!("expected a JSON list, got {}", json_type_name(&other)),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn header_u64(response: &RawResponse, name: &str) -> Option<u64> {
    response.header(name)?.trim().parse().ok()
}

/// `x-ratelimit-reset` is UTC epoch seconds.
fn header_reset(response: &RawResponse) -> Option<DateTime<Utc>> {
    let epoch: i64 = response.header("x-ratelimit-reset")?.trim().parse().ok()?;
    Utc.timestamp_opt(epoch, 0).single()
}
