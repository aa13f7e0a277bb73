//! Template evaluation backends

use std::error::Error as StdError;

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

use crate::node::Attributes;

use super::RenderConfig;

/// Values visible to a template: the node's attributes as `item` and the
/// composed children text as `inner`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateContext<'a> {
    pub item: &'a Attributes,
    pub inner: &'a str,
}

impl<'a> TemplateContext<'a> {
    pub fn new(item: &'a Attributes, inner: &'a str) -> Self {
        Self { item, inner }
    }
}

/// Failure reported by a template backend
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TemplateEngineError(Box<dyn StdError + Send + Sync>);

impl TemplateEngineError {
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// Evaluates template text against a context
pub trait TemplateEngine {
    fn render(&self, template: &str, context: &TemplateContext<'_>) -> Result<String, TemplateEngineError>;
}

/// Handlebars-backed engine (`{{item.title}}`, `{{inner}}`, `{{#each}}`, ...)
pub struct HandlebarsEngine {
    registry: Handlebars<'static>,
}

impl HandlebarsEngine {
    pub fn new(config: &RenderConfig) -> Self {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(config.strict);
        if !config.escape_html {
            registry.register_escape_fn(handlebars::no_escape);
        }
        Self { registry }
    }
}

impl Default for HandlebarsEngine {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn render(&self, template: &str, context: &TemplateContext<'_>) -> Result<String, TemplateEngineError> {
        self.registry
            .render_template(template, context)
            .map_err(TemplateEngineError::new)
    }
}
