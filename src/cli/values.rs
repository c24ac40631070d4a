//! Effective configuration values for a layered values directory.

use anyhow::{Context, Result};
use clap::Args;
use serde_yaml::Value;
use std::path::PathBuf;

use super::utils::write_output;
use crate::values::{effective_values, lookup};

// --version here names the application version overlay, so the usual
// version flag is disabled for this one subcommand.
#[derive(Args)]
#[command(disable_version_flag = true)]
pub struct ValuesArgs {
    /// Directory holding values.yaml plus versions/ and environments/
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Version overlay to apply (versions/<VERSION>/values.yaml)
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,

    /// Environment overlay to apply (environments/<ENV>/values.yaml)
    #[arg(short, long = "env", value_name = "ENV")]
    pub environment: Option<String>,

    /// Print only the value at this dotted path (e.g. image.tag)
    #[arg(short, long, value_name = "PATH")]
    pub get: Option<String>,

    /// Fallback when --get finds nothing
    #[arg(long, value_name = "VALUE", requires = "get")]
    pub default: Option<String>,

    /// Output format: yaml or json
    #[arg(short, long, value_name = "FORMAT", default_value = "yaml")]
    pub format: String,

    /// Write here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ValuesArgs) -> Result<()> {
    if !matches!(args.format.as_str(), "yaml" | "json") {
        anyhow::bail!("Values supports yaml or json output, not '{}'", args.format);
    }

    let document =
        effective_values(&args.dir, args.version.as_deref(), args.environment.as_deref())
            .with_context(|| {
                format!("Computing effective values under {}", args.dir.display())
            })?;

    let rendered = match args.get.as_deref() {
        Some(path) => {
            // An explicit null counts as absent for defaulting purposes,
            // mirroring the `//` operator in yq.
            match (lookup(&document, path), args.default.as_ref()) {
                (Some(value), _) if !value.is_null() => scalar_or_block(value, &args.format)?,
                (_, Some(fallback)) => fallback.clone(),
                (Some(_), None) => "null".to_string(),
                (None, None) => {
                    anyhow::bail!("No value at '{path}' under {}", args.dir.display())
                }
            }
        }
        None => serialize(&document, &args.format)?,
    };

    write_output(&rendered, args.output.as_deref())
}

/// Bare scalars print raw so shell substitution stays clean; mappings and
/// sequences serialize like the full document.
fn scalar_or_block(value: &Value, format: &str) -> Result<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Bool(_) | Value::Number(_) => {
            Ok(serde_yaml::to_string(value)?.trim_end().to_string())
        }
        _ => serialize(value, format),
    }
}

fn serialize(value: &Value, format: &str) -> Result<String> {
    if format == "json" {
        let as_json = serde_json::to_value(value)?;
        Ok(serde_json::to_string_pretty(&as_json)?)
    } else {
        Ok(serde_yaml::to_string(value)?)
    }
}
