//! repo-pulse: GitHub repository activity reports and layered configuration values

use anyhow::Result;

fn main() -> Result<()> {
    repo_pulse::cli::run()
}
