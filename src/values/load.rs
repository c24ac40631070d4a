//! Layer file discovery and loading

use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;
use tracing::debug;

use super::merge::merge_layers;

/// Well-known filename each layer directory holds.
pub const VALUES_FILE: &str = "values.yaml";

#[derive(Debug, Error)]
pub enum ValuesError {
    /// A layer file exists but is not parseable YAML. Always fatal: a
    /// half-applied overlay is worse than no answer.
    #[error("invalid YAML in {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_yaml::Error },

    /// A layer parsed to something other than a mapping (or `null`).
    /// Merging a top-level list or scalar has no sensible meaning.
    #[error("{} must contain a mapping at the top level", .path.display())]
    NotAMapping { path: PathBuf },

    /// The file exists but could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Where the three layers of a values directory live.
///
/// ```text
/// <dir>/values.yaml                        base
/// <dir>/versions/<V>/values.yaml           version overlay
/// <dir>/environments/<E>/values.yaml       environment overlay
/// ```
#[derive(Debug, Clone)]
pub struct LayerPaths {
    pub base: PathBuf,
    pub version: Option<PathBuf>,
    pub environment: Option<PathBuf>,
}

impl LayerPaths {
    pub fn new(dir: &Path, version: Option<&str>, environment: Option<&str>) -> Self {
        Self {
            base: dir.join(VALUES_FILE),
            version: version.map(|v| dir.join("versions").join(v).join(VALUES_FILE)),
            environment: environment.map(|e| dir.join("environments").join(e).join(VALUES_FILE)),
        }
    }
}

/// Load one layer. A missing file, an empty file, and a `null` document all
/// mean "this layer contributes nothing" and come back as `None`.
pub fn load_layer(path: &Path) -> Result<Option<Value>, ValuesError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("layer {} absent; treating as empty", path.display());
            return Ok(None);
        }
        Err(err) => return Err(ValuesError::Io { path: path.to_path_buf(), source: err }),
    };
    let parsed: Value = serde_yaml::from_str(&contents)
        .map_err(|err| ValuesError::Parse { path: path.to_path_buf(), source: err })?;
    match parsed {
        Value::Null => Ok(None),
        Value::Mapping(_) => Ok(Some(parsed)),
        _ => Err(ValuesError::NotAMapping { path: path.to_path_buf() }),
    }
}

/// Compute the effective document for a directory plus optional version and
/// environment identifiers. Layers that do not exist are skipped; layers
/// that exist but do not parse abort the computation.
pub fn effective_values(
    dir: &Path,
    version: Option<&str>,
    environment: Option<&str>,
) -> Result<Value, ValuesError> {
    let paths = LayerPaths::new(dir, version, environment);
    let base = load_layer(&paths.base)?;
    let version_layer = match &paths.version {
        Some(path) => load_layer(path)?,
        None => None,
    };
    let environment_layer = match &paths.environment {
        Some(path) => load_layer(path)?,
        None => None,
    };
    Ok(merge_layers(base, version_layer, environment_layer))
}
