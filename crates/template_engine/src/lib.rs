//! # Template Engine
//!
//! Handlebars-based expansion of templated configuration values. The
//! templating surface is deliberately fixed: values render against a small
//! context (the requested application and profile lists) with a closed set
//! of helpers. This is not a generic templating layer.
//!
//! ## Helpers
//!
//! - `first` / `last`: first/last element of a list parameter
//! - `dashToUnderscore`: replace every `-` with `_`
//! - `upperCase` / `lowerCase`: case conversion
//! - `trim`: strip surrounding whitespace
//!
//! Helpers produce values, so they compose as subexpressions:
//! `{{dashToUnderscore (first Profiles)}}`.
//!
//! ## Example
//!
//! ```rust
//! # use template_engine::TemplateEngine;
//! # use serde_json::json;
//! let engine = TemplateEngine::new();
//! let data = json!({"Applications": ["accounts"], "Profiles": ["prod-uk"]});
//!
//! let rendered = engine
//!     .render("App: {{first Applications}}, P: {{dashToUnderscore (first Profiles)}}", &data)
//!     .unwrap();
//! assert_eq!(rendered, "App: accounts, P: prod_uk");
//! ```

use handlebars::{
    Context, Handlebars, Helper, HelperDef, RenderContext, RenderError, ScopedJson,
};
use serde_json::Value;

pub mod errors;
pub use errors::Error;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

fn list_param<'a>(h: &'a Helper<'_, '_>, helper_name: &str) -> Result<&'a [Value], RenderError> {
    h.param(0)
        .and_then(|v| v.value().as_array())
        .map(|list| list.as_slice())
        .ok_or_else(|| RenderError::new(format!("{helper_name} helper requires a list parameter")))
}

fn string_param<'a>(h: &'a Helper<'_, '_>, helper_name: &str) -> Result<&'a str, RenderError> {
    h.param(0)
        .and_then(|v| v.value().as_str())
        .ok_or_else(|| {
            RenderError::new(format!("{helper_name} helper requires a string parameter"))
        })
}

/// Helper returning the first element of a list parameter.
struct FirstHelper;

impl HelperDef for FirstHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let list = list_param(h, "first")?;
        Ok(ScopedJson::Derived(
            list.first().cloned().unwrap_or(Value::Null),
        ))
    }
}

/// Helper returning the last element of a list parameter.
struct LastHelper;

impl HelperDef for LastHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let list = list_param(h, "last")?;
        Ok(ScopedJson::Derived(
            list.last().cloned().unwrap_or(Value::Null),
        ))
    }
}

/// Helper replacing every dash with an underscore.
struct DashToUnderscoreHelper;

impl HelperDef for DashToUnderscoreHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let param = string_param(h, "dashToUnderscore")?;
        Ok(ScopedJson::Derived(Value::String(param.replace('-', "_"))))
    }
}

/// Helper converting text to upper case.
struct UpperCaseHelper;

impl HelperDef for UpperCaseHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let param = string_param(h, "upperCase")?;
        Ok(ScopedJson::Derived(Value::String(param.to_uppercase())))
    }
}

/// Helper converting text to lower case.
struct LowerCaseHelper;

impl HelperDef for LowerCaseHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let param = string_param(h, "lowerCase")?;
        Ok(ScopedJson::Derived(Value::String(param.to_lowercase())))
    }
}

/// Helper stripping surrounding whitespace.
struct TrimHelper;

impl HelperDef for TrimHelper {
    fn call_inner<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
    ) -> Result<ScopedJson<'reg, 'rc>, RenderError> {
        let param = string_param(h, "trim")?;
        Ok(ScopedJson::Derived(Value::String(param.trim().to_string())))
    }
}

/// Template engine with the fixed helper surface registered.
pub struct TemplateEngine {
    registry: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_helper("first", Box::new(FirstHelper));
        registry.register_helper("last", Box::new(LastHelper));
        registry.register_helper("dashToUnderscore", Box::new(DashToUnderscoreHelper));
        registry.register_helper("upperCase", Box::new(UpperCaseHelper));
        registry.register_helper("lowerCase", Box::new(LowerCaseHelper));
        registry.register_helper("trim", Box::new(TrimHelper));
        Self { registry }
    }

    /// Render one templated value against the given context.
    pub fn render(&self, template: &str, data: &Value) -> Result<String, Error> {
        Ok(self.registry.render_template(template, data)?)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}
