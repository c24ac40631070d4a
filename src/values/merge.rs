//! Deterministic deep merge of layered mappings

use serde_yaml::mapping::Entry;
use serde_yaml::{Mapping, Value};

/// Merge `overlay` into `base` in place.
///
/// Two mappings merge key by key, recursively. Every other pairing
/// (scalar over scalar, list over list, scalar over mapping, mapping over
/// scalar) is replaced by `overlay`'s value wholesale; lists are never
/// concatenated or merged element-wise. Keys present only in `base`
/// survive untouched, and key order is preserved: `base`'s keys first,
/// then new keys in `overlay` order.
pub fn deep_merge(base: &mut Mapping, overlay: Mapping) {
    for (key, incoming) in overlay {
        match base.entry(key) {
            Entry::Occupied(mut entry) => match (entry.get_mut(), incoming) {
                (Value::Mapping(existing), Value::Mapping(nested)) => {
                    deep_merge(existing, nested);
                }
                (slot, incoming) => *slot = incoming,
            },
            Entry::Vacant(entry) => {
                entry.insert(incoming);
            }
        }
    }
}

/// Combine the three layers in fixed precedence: base, then version, then
/// environment. Absent layers (`None`, or a document that parsed to `null`)
/// contribute nothing. Always returns a mapping.
pub fn merge_layers(
    base: Option<Value>,
    version: Option<Value>,
    environment: Option<Value>,
) -> Value {
    let mut merged = into_mapping(base);
    deep_merge(&mut merged, into_mapping(version));
    deep_merge(&mut merged, into_mapping(environment));
    Value::Mapping(merged)
}

// Loading rejects non-mapping documents before they get here; anything
// else is treated as an empty layer.
fn into_mapping(layer: Option<Value>) -> Mapping {
    match layer {
        Some(Value::Mapping(map)) => map,
        _ => Mapping::new(),
    }
}
