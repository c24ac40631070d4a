//! Tool configuration
//!
//! Settings come from a discovered or explicit file, then CLI flags are
//! merged on top (CLI > file > defaults).

pub mod loader;
pub mod merge;

pub use loader::load_settings;
pub use merge::{merge_cli_with_settings, CliOverrides};

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::github::FetchConfig;

/// Settings file schema. Every field is optional; anything unset falls back
/// to the engine defaults. Unknown keys are rejected so typos surface.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Repository slug "owner/name".
    pub repo: Option<String>,
    /// API root override (GitHub Enterprise or a mirror).
    pub api_url: Option<String>,
    /// Issue/PR state filter: "open", "closed", "all".
    pub state: Option<String>,
    /// Report format: "terminal", "markdown", "csv", "json".
    pub format: Option<String>,
    /// Records per page, 1 to 100.
    pub page_size: Option<u32>,
    /// Stop after this many pages.
    pub max_pages: Option<u32>,
    /// Pause between page requests, in milliseconds.
    pub throttle_ms: Option<u64>,
    /// Per-request timeout, in seconds.
    pub timeout_secs: Option<u64>,
    /// Attempts per page for transient failures, at least 1.
    pub retry_attempts: Option<u32>,
    /// Base backoff between attempts, in milliseconds.
    pub retry_backoff_ms: Option<u64>,
    /// Bearer token file; overrides the default credential location.
    pub token_file: Option<PathBuf>,
}

impl Settings {
    /// Reject values the engine would misbehave on. Runs strictly on the
    /// merged CLI+file result and on explicitly passed files.
    pub fn validate(&self) -> Result<()> {
        if let Some(state) = &self.state {
            if !matches!(state.as_str(), "open" | "closed" | "all") {
                bail!("invalid state '{state}' (expected open, closed, or all)");
            }
        }
        if let Some(format) = &self.format {
            if !matches!(format.as_str(), "terminal" | "markdown" | "csv" | "json") {
                bail!("invalid format '{format}' (expected terminal, markdown, csv, or json)");
            }
        }
        if let Some(size) = self.page_size {
            if size == 0 || size > 100 {
                bail!("page_size must be between 1 and 100, got {size}");
            }
        }
        if let Some(pages) = self.max_pages {
            if pages == 0 {
                bail!("max_pages must be at least 1");
            }
        }
        if self.retry_attempts == Some(0) {
            bail!("retry_attempts must be at least 1");
        }
        Ok(())
    }

    /// Translate into engine knobs, defaulting anything unset.
    pub fn fetch_config(&self) -> FetchConfig {
        let mut config = FetchConfig::default();
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if let Some(ms) = self.throttle_ms {
            config.throttle = Duration::from_millis(ms);
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(attempts) = self.retry_attempts {
            config.retry.max_attempts = attempts;
        }
        if let Some(ms) = self.retry_backoff_ms {
            config.retry.base_delay = Duration::from_millis(ms);
        }
        config
    }
}
