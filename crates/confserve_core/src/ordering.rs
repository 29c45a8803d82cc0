//! Precedence ordering of property sources.
//!
//! Sources sort weakest first, strongest last, on the short form of their
//! qualified names. Tiers, weakest to strongest:
//!
//! 1. `application.*`: the shared base document
//! 2. `application-<profile>.*`: shared profile documents, later requested
//!    profiles weaker
//! 3. application-scoped documents: later requested applications weaker,
//!    then later profiles weaker
//!
//! Ties keep discovery order (the sort is stable).

use std::cmp::Ordering;

use crate::names::{short_name, BASE_LEVEL, DEFAULT_APPLICATION_PREFIX};
use crate::source::PropertySource;

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod tests;

/// Rank given to names matching no requested application or profile; any
/// real match beats it.
const NOT_FOUND_INDEX: usize = 9999;

fn tier(short: &str) -> u8 {
    if short.starts_with(BASE_LEVEL) {
        0
    } else if short.starts_with(DEFAULT_APPLICATION_PREFIX) {
        1
    } else {
        2
    }
}

fn app_index(applications: &[String], short: &str) -> usize {
    applications
        .iter()
        .position(|app| short.starts_with(app.as_str()))
        .unwrap_or(NOT_FOUND_INDEX)
}

fn profile_index(profiles: &[String], short: &str) -> usize {
    profiles
        .iter()
        .position(|profile| short.contains(&format!("-{profile}.")))
        .unwrap_or(NOT_FOUND_INDEX)
}

/// Compare two property sources; `Less` means weaker.
pub fn compare_sources(
    applications: &[String],
    profiles: &[String],
    left: &PropertySource,
    right: &PropertySource,
) -> Ordering {
    let left_name = short_name(&left.name);
    let right_name = short_name(&right.name);

    let left_tier = tier(left_name);
    let right_tier = tier(right_name);
    if left_tier != right_tier {
        return left_tier.cmp(&right_tier);
    }

    match left_tier {
        0 => Ordering::Equal,
        1 => {
            // A later profile is weaker, so sorts earlier.
            profile_index(profiles, right_name).cmp(&profile_index(profiles, left_name))
        }
        _ => {
            let left_app = app_index(applications, left_name);
            let right_app = app_index(applications, right_name);
            if left_app != right_app {
                return right_app.cmp(&left_app);
            }
            profile_index(profiles, right_name).cmp(&profile_index(profiles, left_name))
        }
    }
}

/// The strongest-to-weakest short-name list shown to clients.
pub fn precedence_display(ordered: &[&PropertySource]) -> String {
    ordered
        .iter()
        .rev()
        .map(|ps| short_name(&ps.name))
        .collect::<Vec<_>>()
        .join(" > ")
}
