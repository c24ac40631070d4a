//! repo-pulse: GitHub repository activity reports and layered configuration values
//!
//! The library half of the `repo-pulse` tool. The [`github`] module walks
//! paginated REST endpoints with throttling and retries, [`analyze`] turns
//! raw records into classified reports, [`render`] writes them in four
//! formats, and [`values`] computes Helm-style layered configuration
//! documents with dotted-path lookup.

pub mod analyze;
pub mod cli;
pub mod config;
pub mod domain;
pub mod github;
pub mod render;
pub mod utils;
pub mod values;
