//! The source aggregate returned for unresolved requests.

use serde::{Deserialize, Serialize};

use crate::JsonMap;

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;

/// One document's contribution of keys, named by its qualified name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySource {
    pub name: String,
    pub source: JsonMap,
}

/// The aggregate of everything discovered for a request.
///
/// `property_sources` keeps discovery order; precedence sorting happens on a
/// separate view inside reconciliation so clients asking for the raw
/// aggregate see the documents as they were found.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub name: String,
    pub profiles: Vec<String>,
    pub label: String,
    pub version: String,
    pub state: String,
    pub property_sources: Vec<PropertySource>,
}
