//! YAML document decoding.
//!
//! Documents decode to `serde_json` mappings so the rest of the pipeline
//! works over a single dynamic value model. YAML aliases are expanded during
//! parsing and `<<:` merge keys are applied before conversion.
//!
//! Encrypted documents are recognised by a top-level metadata key; when one
//! is present the raw bytes are handed to the injected [`Decrypter`] and the
//! plaintext is parsed instead. The metadata key is stripped from the
//! resulting mapping either way.

use serde_json::Value;

use crate::errors::DecodeError;
use crate::JsonMap;

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;

/// Top-level key marking a document as encrypted.
pub const ENCRYPTION_METADATA_KEY: &str = "sops";

/// Adapter decrypting an encrypted document into plaintext YAML bytes.
pub trait Decrypter: Send + Sync {
    fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, DecodeError>;
}

/// Decode raw document bytes into a mapping.
pub fn decode_document(
    bytes: &[u8],
    decrypter: Option<&dyn Decrypter>,
) -> Result<JsonMap, DecodeError> {
    let mut value: serde_yaml::Value = serde_yaml::from_slice(bytes)?;

    if is_encrypted(&value) {
        let decrypter = decrypter.ok_or(DecodeError::NoDecrypter)?;
        let plaintext = decrypter.decrypt(bytes)?;
        value = serde_yaml::from_slice(&plaintext)?;
    }

    value.apply_merge()?;

    let mut map = into_json_map(value)?;
    map.remove(ENCRYPTION_METADATA_KEY);
    Ok(map)
}

fn is_encrypted(value: &serde_yaml::Value) -> bool {
    value
        .as_mapping()
        .map(|m| {
            m.iter()
                .any(|(key, _)| key.as_str() == Some(ENCRYPTION_METADATA_KEY))
        })
        .unwrap_or(false)
}

fn into_json_map(value: serde_yaml::Value) -> Result<JsonMap, DecodeError> {
    match yaml_to_json(value) {
        Value::Object(map) => Ok(map),
        // An empty document decodes to null; treat it as an empty mapping.
        Value::Null => Ok(JsonMap::new()),
        _ => Err(DecodeError::NotAMapping),
    }
}

/// Convert a YAML value into the pipeline's JSON value model.
///
/// Non-string mapping keys are stringified; tagged values lose their tag.
pub fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                serde_json::Number::from_f64(n.as_f64().unwrap_or(0.0))
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Value::Array(seq.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = JsonMap::new();
            for (key, val) in mapping {
                map.insert(key_to_string(key), yaml_to_json(val));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => match yaml_to_json(other) {
            Value::String(s) => s,
            value => value.to_string(),
        },
    }
}
