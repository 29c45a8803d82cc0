//! Template expansion and placeholder substitution.
//!
//! Every string value goes through two passes:
//!
//! 1. **Template pass**: when the value contains both configured
//!    delimiters it renders against the fixed request context
//!    (`Applications`, `Profiles`). Render failures abort resolution.
//! 2. **Placeholder pass**: each `${name[:default]}` is substituted.
//!    Prefixed names delegate to the external secret resolver; anything
//!    else looks up the reconciled map, descending recursively when the
//!    referenced value itself contains a placeholder. A name already on the
//!    descent stack is a cycle and aborts resolution.
//!
//! Missing references and empty placeholders substitute the empty string
//! and accumulate warnings; they never fail a request.

use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::warn;

use app_config::TemplateSettings;
use secret_store::SecretResolver;
use template_engine::TemplateEngine;

use crate::errors::ResolveError;
use crate::JsonMap;

#[cfg(test)]
#[path = "placeholder_tests.rs"]
mod tests;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]*)\}").expect("placeholder pattern is valid"))
}

/// Resolves one reconciled map; create per request.
pub struct PropertiesResolver<'a> {
    data: JsonMap,
    messages: Vec<String>,
    error: Option<ResolveError>,

    engine: &'a TemplateEngine,
    template_settings: &'a TemplateSettings,
    template_context: Value,
    secret_resolver: Option<&'a SecretResolver>,
}

impl<'a> PropertiesResolver<'a> {
    pub fn new(
        data: JsonMap,
        engine: &'a TemplateEngine,
        template_settings: &'a TemplateSettings,
        template_context: Value,
        secret_resolver: Option<&'a SecretResolver>,
    ) -> Self {
        Self {
            data,
            messages: Vec::new(),
            error: None,
            engine,
            template_settings,
            template_context,
            secret_resolver,
        }
    }

    /// Resolve every value, returning the map and the accumulated warnings.
    pub fn resolve_from_top(mut self) -> Result<(JsonMap, Vec<String>), ResolveError> {
        let keys: Vec<String> = self.data.keys().cloned().collect();
        for key in keys {
            let Some(value) = self.data.get(&key).cloned() else {
                continue;
            };
            let resolved = self.resolve_value(&key, value);
            if let Some(error) = self.error.take() {
                return Err(error);
            }
            self.data.insert(key, resolved);
        }
        Ok((self.data, self.messages))
    }

    fn resolve_value(&mut self, property_name: &str, value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut resolved = JsonMap::new();
                for (key, child) in map {
                    let child = self.resolve_value(&key, child);
                    resolved.insert(key, child);
                }
                Value::Object(resolved)
            }
            Value::Array(items) => {
                // One descent stack covers the whole list.
                let mut stack = HashSet::new();
                let resolved = items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => {
                            Value::String(self.resolve_string(property_name, &s, &mut stack))
                        }
                        Value::Object(map) => {
                            self.resolve_value(property_name, Value::Object(map))
                        }
                        other => {
                            let text = scalar_to_string(&other);
                            Value::String(self.resolve_string(property_name, &text, &mut stack))
                        }
                    })
                    .collect();
                Value::Array(resolved)
            }
            Value::String(s) => {
                let mut stack = HashSet::new();
                Value::String(self.resolve_string(property_name, &s, &mut stack))
            }
            other => other,
        }
    }

    fn resolve_string(
        &mut self,
        property_name: &str,
        value: &str,
        stack: &mut HashSet<String>,
    ) -> String {
        let templated = if value.contains(self.template_settings.left_delim.as_str())
            && value.contains(self.template_settings.right_delim.as_str())
        {
            match self.engine.render(value, &self.template_context) {
                Ok(rendered) => rendered,
                Err(e) => {
                    self.error = Some(ResolveError::Template(e));
                    return String::new();
                }
            }
        } else {
            value.to_string()
        };

        if self.error.is_some() {
            return String::new();
        }

        placeholder_regex()
            .replace_all(&templated, |caps: &Captures<'_>| {
                self.substitute(property_name, caps, stack)
            })
            .into_owned()
    }

    fn substitute(
        &mut self,
        property_name: &str,
        caps: &Captures<'_>,
        stack: &mut HashSet<String>,
    ) -> String {
        let found = &caps[0];
        let content = caps[1].trim();

        if content.is_empty() {
            self.add_message(format!(
                "Missing placeholder [{found}] for property [{property_name}]"
            ));
            return String::new();
        }

        if SecretResolver::can_resolve(content) {
            if let Some(resolver) = self.secret_resolver {
                return self.substitute_external(resolver, content);
            }
        }

        let (name, default) = match content.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (content, None),
        };

        if name.is_empty() {
            self.add_message(format!(
                "Missing placeholder [{found}] for property [{property_name}]"
            ));
            return String::new();
        }

        if let Some(current) = self.data.get(name).cloned() {
            match current {
                Value::String(text) if text.contains("${") => {
                    if stack.contains(name) {
                        self.error = Some(ResolveError::PlaceholderCycle {
                            placeholder: format!("${{{name}}}"),
                        });
                        return String::new();
                    }
                    stack.insert(name.to_string());

                    let resolved = self.resolve_string(name, &text, stack);
                    self.data.insert(name.to_string(), Value::String(resolved));
                }
                Value::String(text) => return text,
                other => return scalar_to_string(&other),
            }

            // Re-read after the recursive descent wrote the value back.
            if let Some(Value::String(text)) = self.data.get(name) {
                return text.clone();
            }
        }

        match default {
            Some(default) if !default.is_empty() => default.to_string(),
            Some(_) => {
                self.add_message(format!("Empty default for property [{name}]"));
                String::new()
            }
            None => {
                self.add_message(format!("Missing value for property [{name}]"));
                String::new()
            }
        }
    }

    fn substitute_external(&mut self, resolver: &SecretResolver, content: &str) -> String {
        let (reference, default) = SecretResolver::split_default(content);

        match resolver.resolve(reference) {
            Err(e) => {
                self.error = Some(ResolveError::SecretStore(e));
                String::new()
            }
            Ok(Some(value)) => value,
            Ok(None) => match default.filter(|d| !d.is_empty()) {
                Some(default) => default.to_string(),
                None => {
                    self.add_message(format!("Missing external value for [{reference}]"));
                    String::new()
                }
            },
        }
    }

    fn add_message(&mut self, message: String) {
        warn!("{message}");
        self.messages.push(message);
    }
}

/// Stringify a non-string value the way placeholder substitution needs it.
pub(crate) fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
