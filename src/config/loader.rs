//! Settings file loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::Settings;

pub fn load_settings(dir: &Path, settings_path: Option<&Path>) -> Result<Settings> {
    let explicitly_provided = settings_path.is_some();

    let discovered = match settings_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_settings(dir),
    };

    let Some(settings_file) = discovered else {
        return Ok(Settings::default());
    };

    let content = fs::read_to_string(&settings_file)
        .with_context(|| format!("Failed reading settings file: {}", settings_file.display()))?;

    let ext =
        settings_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    // An explicitly passed file must be valid; a discovered one soft-fails
    // to defaults with a warning so a broken file never blocks a run.
    let parsed = match ext.as_str() {
        "toml" => parse_toml_settings(&content, &settings_file),
        "yaml" | "yml" => parse_yaml_settings(&content, &settings_file),
        other => Err(anyhow::anyhow!(
            "Unsupported settings extension '.{}' for file {}",
            other,
            settings_file.display()
        )),
    };

    let checked = parsed.and_then(|settings| {
        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", settings_file.display()))?;
        Ok(settings)
    });

    match checked {
        Ok(settings) => Ok(settings),
        Err(error) if explicitly_provided => Err(error),
        Err(error) => {
            tracing::warn!(
                "Ignoring auto-discovered settings {}: {}",
                settings_file.display(),
                error
            );
            Ok(Settings::default())
        }
    }
}

/// Parse TOML, supporting both top-level keys and a nested [repo-pulse]
/// section for files shared with other tools.
fn parse_toml_settings(content: &str, settings_file: &Path) -> Result<Settings> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", settings_file.display()))?;

    let settings_val = match raw.get("repo-pulse") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    settings_val
        .try_into()
        .with_context(|| format!("Invalid TOML settings: {}", settings_file.display()))
}

/// Parse YAML, with the same nested-section support as TOML.
fn parse_yaml_settings(content: &str, settings_file: &Path) -> Result<Settings> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", settings_file.display()))?;

    let settings_val = match raw.get("repo-pulse") {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(settings_val)
        .with_context(|| format!("Invalid YAML settings: {}", settings_file.display()))
}

fn discover_settings(dir: &Path) -> Option<std::path::PathBuf> {
    let candidates = [
        "repo-pulse.toml",
        ".repo-pulse.toml",
        "repo-pulse.yml",
        ".repo-pulse.yml",
        "repo-pulse.yaml",
        ".repo-pulse.yaml",
    ];

    for candidate in candidates {
        let path = dir.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}
