//! Reconciliation: ordering, merging, resolution and injections.

use serde_json::json;
use tracing::warn;

use app_config::TemplateSettings;
use secret_store::SecretResolver;
use template_engine::TemplateEngine;

use crate::errors::ResolveError;
use crate::injection::{is_post_stage, pre_stage_key, InjectedProperties, POST_STAGE_LABEL, PRE_STAGE_LABEL};
use crate::list_cleanup::{find_replaced_list_prefixes, is_replaced_list_entry};
use crate::merge::{override_value, Duplicate};
use crate::ordering::{compare_sources, precedence_display};
use crate::placeholder::PropertiesResolver;
use crate::source::{PropertySource, Source};
use crate::JsonMap;

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;

/// Out-of-band information about one reconciliation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionMetadata {
    /// Strongest-to-weakest source names, ` > `-joined.
    pub precedence_display_message: String,
}

/// Folds a request's property sources into one resolved map.
pub struct Reconciler<'a> {
    engine: &'a TemplateEngine,
    template_settings: &'a TemplateSettings,
    secret_resolver: Option<&'a SecretResolver>,
    /// Sources carry pre-flattened `prefix[i]` keys, engaging the list
    /// replacement rule.
    flattened_lists: bool,

    duplicates: Vec<Duplicate>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        engine: &'a TemplateEngine,
        template_settings: &'a TemplateSettings,
        secret_resolver: Option<&'a SecretResolver>,
        flattened_lists: bool,
    ) -> Self {
        Self {
            engine,
            template_settings,
            secret_resolver,
            flattened_lists,
            duplicates: Vec::new(),
        }
    }

    /// The no-effect overrides observed by the last reconcile call.
    pub fn duplicates(&self) -> &[Duplicate] {
        &self.duplicates
    }

    /// Merge and resolve everything discovered for the request.
    ///
    /// The source aggregate is not modified; precedence sorting happens on
    /// a separate view so the aggregate keeps discovery order.
    pub fn reconcile(
        &mut self,
        applications: &[String],
        profiles: &[String],
        injections: &InjectedProperties,
        source: &Source,
    ) -> Result<(JsonMap, ResolutionMetadata), ResolveError> {
        let mut reconciled = JsonMap::new();

        // Pre-stage injections form the weakest layer: defaults any
        // document source may override.
        for (key, value) in injections {
            if let Some(stripped) = pre_stage_key(key) {
                override_value(
                    &mut reconciled,
                    stripped,
                    value.clone(),
                    PRE_STAGE_LABEL,
                    &mut self.duplicates,
                );
            }
        }

        let mut ordered: Vec<&PropertySource> = source.property_sources.iter().collect();
        ordered.sort_by(|left, right| compare_sources(applications, profiles, left, right));

        let metadata = ResolutionMetadata {
            precedence_display_message: precedence_display(&ordered),
        };

        let wiped = if self.flattened_lists {
            find_replaced_list_prefixes(&ordered)
        } else {
            Vec::new()
        };

        for (i, ps) in ordered.iter().enumerate() {
            for (key, value) in &ps.source {
                if self.flattened_lists && is_replaced_list_entry(&ps.name, &wiped[i], key) {
                    continue;
                }
                override_value(
                    &mut reconciled,
                    key,
                    value.clone(),
                    &ps.name,
                    &mut self.duplicates,
                );
            }
        }

        let template_context = json!({
            "Applications": applications,
            "Profiles": profiles,
        });
        let resolver = PropertiesResolver::new(
            reconciled,
            self.engine,
            self.template_settings,
            template_context,
            self.secret_resolver,
        );
        let (mut values, _warnings) = resolver.resolve_from_top()?;

        // Post-stage injections land on top of the resolved map and are
        // not themselves resolved.
        for (key, value) in injections {
            if is_post_stage(key) {
                override_value(
                    &mut values,
                    key,
                    value.clone(),
                    POST_STAGE_LABEL,
                    &mut self.duplicates,
                );
            }
        }

        if !self.duplicates.is_empty() {
            let summary = self
                .duplicates
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            warn!("Unnecessary overrides were found: {summary}");
        }

        Ok((values, metadata))
    }
}
