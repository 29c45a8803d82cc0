//! The per-request resolution parameters.

/// Everything a request tells the pipeline.
///
/// Built at the HTTP boundary: path parameters fill the name lists and
/// label, query parameters fill the flags (falling back to the server's
/// configured defaults when absent).
#[derive(Debug, Clone, Default)]
pub struct ResolutionRequest {
    pub applications: Vec<String>,
    pub profiles: Vec<String>,
    pub label: String,

    /// Re-synchronise backends with their origin before snapshotting.
    pub refresh: bool,
    /// Flatten each property source's mapping with `.`-joined keys.
    pub flatten: bool,
    /// Additionally represent list entries as `prefix[i]` keys.
    pub flatten_lists: bool,
    pub log_responses: bool,
    pub pretty: bool,
}
