//! Override merging.
//!
//! Sources are walked weakest to strongest; each key folds into the
//! reconciled map under per-type rules:
//!
//! - mappings merge one level deep: the incoming mapping's entries
//!   overwrite the existing mapping's entries, deeper levels replace
//! - lists replace wholesale, never element-merge
//! - scalars overwrite; an overwrite with an equal value is recorded as a
//!   duplicate for diagnostics but still counts as applied

use serde_json::Value;
use std::fmt;

use crate::JsonMap;

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;

/// An override that had no effect: the new value equalled the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct Duplicate {
    pub key: String,
    pub value: Value,
    pub source: String,
}

impl fmt::Display for Duplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({});", self.key, self.value, self.source)
    }
}

/// Apply one override into the reconciled map.
pub(crate) fn override_value(
    reconciled: &mut JsonMap,
    key: &str,
    value: Value,
    source: &str,
    duplicates: &mut Vec<Duplicate>,
) {
    let absent = matches!(reconciled.get(key), None | Some(Value::Null));
    if absent {
        reconciled.insert(key.to_string(), value);
        return;
    }

    // The key exists from the check above.
    let Some(existing) = reconciled.get_mut(key) else {
        return;
    };

    match value {
        Value::Object(incoming) => {
            if let Value::Object(target) = existing {
                for (child_key, child_value) in incoming {
                    target.insert(child_key, child_value);
                }
            } else {
                *existing = Value::Object(incoming);
            }
        }
        Value::Array(_) => {
            *existing = value;
        }
        scalar => {
            if *existing == scalar {
                duplicates.push(Duplicate {
                    key: key.to_string(),
                    value: scalar,
                    source: source.to_string(),
                });
            } else {
                *existing = scalar;
            }
        }
    }
}
