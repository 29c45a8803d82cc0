//! Application and profile name handling.

#[cfg(test)]
#[path = "names_tests.rs"]
mod tests;

/// Documents named exactly this apply to every application.
pub const DEFAULT_APPLICATION_NAME: &str = "application";

/// Prefix of profile-scoped base documents, e.g. `application-production`.
pub const DEFAULT_APPLICATION_PREFIX: &str = "application-";

/// Short-name prefix identifying the weakest precedence tier.
pub const BASE_LEVEL: &str = "application.";

/// Split a comma-separated list, trimming entries and dropping empties.
pub fn split_names(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip any path or repository qualification, keeping the text after the
/// final `/`.
pub fn short_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
