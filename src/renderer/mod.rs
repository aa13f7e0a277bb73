//! Document renderer
//!
//! Walks a resolved tree bottom-up. A node's inner text is the
//! concatenation of its rendered children; nodes bound to a template pass
//! that text (as `inner`) and their attributes (as `item`) through the
//! template engine, all other nodes emit the inner text unchanged.

pub mod config;
pub mod engine;

pub use config::RenderConfig;
pub use engine::{HandlebarsEngine, TemplateContext, TemplateEngine, TemplateEngineError};

use thiserror::Error;
use tracing::trace;

use crate::node::{Content, Node, Unit};

/// Errors that can occur while rendering a tree
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template engine rejected a node's template
    #[error("template '{layout}' failed for node '{node}': {source}")]
    Template {
        node: String,
        layout: String,
        #[source]
        source: TemplateEngineError,
    },
}

/// Renders resolved trees through a template engine
pub struct Renderer<E = HandlebarsEngine> {
    engine: E,
}

impl Renderer<HandlebarsEngine> {
    pub fn new(config: &RenderConfig) -> Self {
        Self::with_engine(HandlebarsEngine::new(config))
    }
}

impl Default for Renderer<HandlebarsEngine> {
    fn default() -> Self {
        Self::new(&RenderConfig::default())
    }
}

impl<E: TemplateEngine> Renderer<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Render a node and everything below it.
    ///
    /// Results are cached on each node, so rendering the same tree again
    /// returns the same text without consulting the engine.
    pub fn render(&self, node: &Node) -> Result<String, RenderError> {
        if let Some(text) = node.rendered() {
            return Ok(text.to_string());
        }

        let inner = self.render_content(node.content())?;
        let text = match node.template() {
            Some(template) => {
                trace!(node = node.name(), layout = %template.layout, "applying template");
                let context = TemplateContext::new(node.attributes(), &inner);
                self.engine
                    .render(&template.text, &context)
                    .map_err(|source| RenderError::Template {
                        node: node.name().to_string(),
                        layout: template.layout.clone(),
                        source,
                    })?
            }
            None => inner,
        };

        Ok(node.rendered.get_or_init(|| text).clone())
    }

    fn render_content(&self, content: &Content) -> Result<String, RenderError> {
        match content {
            Content::Empty => Ok(String::new()),
            Content::Single(unit) => self.render_unit(unit),
            Content::Sequence(units) => {
                let mut text = String::new();
                for unit in units {
                    text.push_str(&self.render_unit(unit)?);
                }
                Ok(text)
            }
        }
    }

    fn render_unit(&self, unit: &Unit) -> Result<String, RenderError> {
        match unit {
            Unit::Text(text) => Ok(text.clone()),
            Unit::Node(node) => self.render(node),
        }
    }
}
