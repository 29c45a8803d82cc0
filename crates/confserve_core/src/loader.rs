//! Discovery: snapshot acquisition and document selection.
//!
//! Documents are matched against the Spring Cloud Config naming rules, in
//! snapshot order:
//!
//! 1. `application` always applies.
//! 2. `application-<profile>` applies when the profile was requested.
//! 3. `<application>` and `<application>-<profile>` apply per requested
//!    application (and profile).
//!
//! The first matching rule wins; a document never contributes more than one
//! property source.

use std::sync::Arc;
use tracing::info;

use config_backend::{Backend, BackendError, Document};

use crate::flatten::{flatten, flatten_indexed_lists};
use crate::names::{DEFAULT_APPLICATION_NAME, DEFAULT_APPLICATION_PREFIX};
use crate::request::ResolutionRequest;
use crate::source::{PropertySource, Source};

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Load every backend's matching documents into a source aggregate.
///
/// Property sources appear in discovery order: backends in their configured
/// order, documents in snapshot order. Versions of all backends join with
/// `; `.
pub fn load_configurations(
    backends: &[Arc<dyn Backend>],
    request: &ResolutionRequest,
) -> Result<Source, BackendError> {
    let mut source = Source {
        name: request.applications.first().cloned().unwrap_or_default(),
        profiles: request.profiles.clone(),
        ..Source::default()
    };

    for backend in backends {
        load_from_backend(backend.as_ref(), request, &mut source)?;
    }

    Ok(source)
}

fn load_from_backend(
    backend: &dyn Backend,
    request: &ResolutionRequest,
    source: &mut Source,
) -> Result<(), BackendError> {
    let snapshot = backend.snapshot(&request.label, request.refresh)?;

    if !snapshot.version.is_empty() {
        if !source.version.is_empty() {
            source.version.push_str("; ");
        }
        source.version.push_str(&snapshot.version);
    }

    snapshot.for_each(|document| {
        let Some(suffix) = document.readable_suffix() else {
            return Ok(());
        };
        let filename = document
            .name()
            .strip_suffix(suffix)
            .unwrap_or_else(|| document.name());

        if is_selected(filename, &request.applications, &request.profiles) {
            add_property_source(document, request, source)?;
        }
        Ok(())
    })
}

/// The selection rules, first match wins.
fn is_selected(filename: &str, applications: &[String], profiles: &[String]) -> bool {
    if filename == DEFAULT_APPLICATION_NAME {
        return true;
    }

    if !profiles.is_empty() {
        if let Some(profile) = filename.strip_prefix(DEFAULT_APPLICATION_PREFIX) {
            return profiles.iter().any(|wanted| wanted == profile);
        }
    }

    for application in applications {
        if filename == application {
            return true;
        }
        if let Some(profile) = filename.strip_prefix(&format!("{application}-")) {
            if profiles.iter().any(|wanted| wanted == profile) {
                return true;
            }
        }
    }

    false
}

fn add_property_source(
    document: &dyn Document,
    request: &ResolutionRequest,
    source: &mut Source,
) -> Result<(), BackendError> {
    info!(
        "Adding property source: config resource '{}' via location '{}'",
        document.qualified_name(),
        document.location()
    );

    let mut map = document.to_map()?;

    if request.flatten {
        map = flatten(&map);

        if request.flatten_lists {
            flatten_indexed_lists(&mut map);
            // Mappings carried inside lists are now `prefix[i]` values;
            // flatten again to expose their entries.
            map = flatten(&map);
        }
    }

    source.property_sources.push(PropertySource {
        name: document.qualified_name(),
        source: map,
    });
    Ok(())
}
