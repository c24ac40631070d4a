//! CLI override merging

use super::Settings;

/// Flag values collected from the command line. `None` means the flag was
/// not given and the file value (or default) stands.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub repo: Option<String>,
    pub api_url: Option<String>,
    pub state: Option<String>,
    pub format: Option<String>,
    pub page_size: Option<u32>,
    pub max_pages: Option<u32>,
}

/// Apply precedence: CLI flags beat file values. Engine tuning knobs with
/// no flag (throttle, timeout, retries, token file) pass through from the
/// file untouched.
pub fn merge_cli_with_settings(file: Settings, cli: CliOverrides) -> Settings {
    Settings {
        repo: cli.repo.or(file.repo),
        api_url: cli.api_url.or(file.api_url),
        state: cli.state.or(file.state),
        format: cli.format.or(file.format),
        page_size: cli.page_size.or(file.page_size),
        max_pages: cli.max_pages.or(file.max_pages),
        throttle_ms: file.throttle_ms,
        timeout_secs: file.timeout_secs,
        retry_attempts: file.retry_attempts,
        retry_backoff_ms: file.retry_backoff_ms,
        token_file: file.token_file,
    }
}
