//! HTTP transport boundary
//!
//! The fetch engine never talks to a socket directly; it goes through the
//! [`Transport`] trait so tests can substitute a scripted implementation.

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

/// A response that produced a status line, whatever that status was.
/// Header names are stored lowercased.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RawResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Failure below the HTTP layer: the request never produced a status line
/// (connect refused, DNS failure, timeout, truncated body).
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// One blocking GET. Implementations return `Ok` for every response that
/// carried a status code, including 4xx/5xx; `Err` only when no usable
/// response arrived at all.
pub trait Transport: Send + Sync {
    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&str, String)],
    ) -> Result<RawResponse, TransportError>;
}

/// Production transport over a shared [`ureq::Agent`].
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `timeout` bounds each request end to end, connect and body included.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&str, String)],
    ) -> Result<RawResponse, TransportError> {
        let mut request = self.agent.get(url);
        for (name, value) in query {
            request = request.query(name, value);
        }
        for (name, value) in headers {
            request = request.set(name, value);
        }
        match request.call() {
            Ok(response) => convert(response),
            // ureq reports 4xx/5xx as errors; the engine wants the response.
            Err(ureq::Error::Status(_, response)) => convert(response),
            Err(ureq::Error::Transport(transport)) => {
                Err(TransportError(transport.to_string()))
            }
        }
    }
}

fn convert(response: ureq::Response) -> Result<RawResponse, TransportError> {
    let status = response.status();
    let mut headers = HashMap::new();
    for name in response.headers_names() {
        if let Some(value) = response.header(&name) {
            headers.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }
    let body = response
        .into_string()
        .map_err(|err| TransportError(format!("reading response body: {err}")))?;
    Ok(RawResponse { status, headers, body })
}
