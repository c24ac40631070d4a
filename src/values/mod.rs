//! Layered deployment values
//!
//! Computes the effective configuration document for a service from up to
//! three YAML layers (base, version, environment) with a deterministic
//! deep merge, and answers dotted-path lookups against the result.

pub mod load;
pub mod merge;
pub mod path;

pub use load::{effective_values, load_layer, LayerPaths, ValuesError, VALUES_FILE};
pub use merge::{deep_merge, merge_layers};
pub use path::{lookup, lookup_or};
