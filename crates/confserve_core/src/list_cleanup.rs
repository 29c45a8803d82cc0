//! List replacement for pre-flattened sources.
//!
//! With indexed-list flattening on, a list arrives as individual
//! `prefix[i]` keys which would otherwise merge index by index across
//! sources. To keep list replacement semantics, the prefix set of each
//! source is computed up front; walking strongest to weakest, a prefix is
//! kept only in the strongest source carrying it and wiped from all weaker
//! ones. Wiped keys are skipped during the merge.

use std::collections::HashSet;
use tracing::info;

use crate::source::PropertySource;
use crate::JsonMap;

#[cfg(test)]
#[path = "list_cleanup_tests.rs"]
mod tests;

/// For each source (ordered weakest first), the list prefixes whose entries
/// must be skipped because a stronger source replaces the whole list.
pub(crate) fn find_replaced_list_prefixes(ordered: &[&PropertySource]) -> Vec<HashSet<String>> {
    let mut wiped: Vec<HashSet<String>> = ordered
        .iter()
        .map(|ps| list_prefixes(&ps.source))
        .collect();

    let mut kept: HashSet<String> = HashSet::new();
    for per_source in wiped.iter_mut().rev() {
        let fresh: Vec<String> = per_source
            .iter()
            .filter(|prefix| !kept.contains(*prefix))
            .cloned()
            .collect();
        for prefix in fresh {
            per_source.remove(&prefix);
            kept.insert(prefix);
        }
    }

    wiped
}

/// The list prefixes present in one source: for any key containing `[`, the
/// text before the first `[`.
fn list_prefixes(source: &JsonMap) -> HashSet<String> {
    source
        .keys()
        .filter_map(|key| {
            key.find('[')
                .filter(|idx| *idx > 0)
                .map(|idx| key[..idx].to_string())
        })
        .collect()
}

/// Whether a key belongs to a list wiped from this source.
pub(crate) fn is_replaced_list_entry(
    source_name: &str,
    wiped: &HashSet<String>,
    key: &str,
) -> bool {
    for prefix in wiped {
        if key.starts_with(&format!("{prefix}[")) {
            info!("Skipping overridden list entry [{key}] in source [{source_name}]");
            return true;
        }
    }
    false
}
