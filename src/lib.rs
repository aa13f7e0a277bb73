//! Struge - layered YAML definitions rendered into a single document
//!
//! A document is described across three sources: a *model* with the
//! instance data, a *component* library of reusable fragments and a
//! *layout* library of named templates. The resolver turns the model's root
//! entry into a concrete [`Node`] tree, expanding name references and
//! inheriting attributes from parent to child; the renderer then composes the
//! document bottom-up through each node's template.
//!
//! # Example
//!
//! ```rust
//! use struge::{generate, DefinitionStore};
//!
//! let store = DefinitionStore::from_yaml_strs(
//!     r#"
//! main:
//!   layout: page
//!   title: Hello
//!   inner: [greeting, "!"]
//! "#,
//!     r#"greeting: "<p>hi</p>""#,
//!     r#"page: "<h1>{{item.title}}</h1>{{inner}}""#,
//! )
//! .unwrap();
//!
//! let html = generate(&store).unwrap();
//! assert_eq!(html, "<h1>Hello</h1><p>hi</p>!");
//! ```

pub mod config;
pub mod error;
pub mod node;
pub mod renderer;
pub mod resolver;
pub mod store;

pub use config::{Config, ConfigError};
pub use error::LoadError;
pub use node::{Attributes, Content, Node, NodeKind, Template, Unit};
pub use renderer::{RenderConfig, RenderError, Renderer, TemplateEngine};
pub use resolver::{resolve_document, InheritancePolicy, ResolveConfig, ResolveError};
pub use store::{DefinitionStore, Source, SourcePaths};

use thiserror::Error;
use tracing::info;

/// Errors that can occur during the generate pipeline
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Error while building the node tree
    #[error("resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    /// Error while applying templates
    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),
}

/// Resolve and render a store with default configuration
pub fn generate(store: &DefinitionStore) -> Result<String, GenerateError> {
    generate_with_config(store, &Config::default())
}

/// Resolve and render a store with custom configuration
///
/// # Example
///
/// ```rust
/// use struge::{generate_with_config, Config, DefinitionStore, ResolveConfig};
///
/// let store = DefinitionStore::from_yaml_strs("index: {inner: [a, b]}", "", "").unwrap();
/// let config = Config::new().with_resolve(ResolveConfig::new().with_root("index"));
///
/// assert_eq!(generate_with_config(&store, &config).unwrap(), "ab");
/// ```
pub fn generate_with_config(store: &DefinitionStore, config: &Config) -> Result<String, GenerateError> {
    let tree = resolve_document(store, &config.resolve)?;
    let document = Renderer::new(&config.render).render(&tree)?;
    info!(bytes = document.len(), "rendered document");
    Ok(document)
}
