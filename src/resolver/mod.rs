//! Resolution of raw definitions into a concrete node tree
//!
//! Starting from the root model entry, every raw specification is turned
//! into a [`Node`]: its own attributes are merged with the parent's, its
//! `layout` is bound to template text and its `inner` value is expanded.
//! Inner elements are looked up by name in the model, component and layout
//! tables (in that order); names matching nothing stay literal text.
//!
//! ```text
//! main:
//!   layout: page
//!   color: navy
//!   inner:
//!     - header                  # model/component/layout reference
//!     - card: {title: First}    # reference with inline overrides
//!     - just some text          # no definition: literal
//! ```

pub mod config;
mod error;
mod inherit;
mod names;

pub use config::ResolveConfig;
pub use error::ResolveError;
pub use inherit::{merge_attributes, protected_key, strip_marker, InheritancePolicy};
pub use names::NameGenerator;

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, trace};

use crate::node::{Attributes, Content, Node, NodeKind, Template, Unit, RESERVED_KEYS};
use crate::store::loader::{key_text, value_kind};
use crate::store::{DefinitionStore, Source};

/// Shape of a raw specification
#[derive(Debug, Clone, Copy)]
pub enum RawSpec<'a> {
    /// Plain content; becomes a leaf holding its text
    Literal(&'a Value),
    Mapping(&'a Mapping),
    /// Shorthand for a mapping holding only `inner`
    Sequence(&'a [Value]),
}

impl<'a> RawSpec<'a> {
    pub fn classify(value: &'a Value) -> Self {
        match value {
            Value::Mapping(mapping) => RawSpec::Mapping(mapping),
            Value::Sequence(items) => RawSpec::Sequence(items),
            Value::Tagged(tagged) => RawSpec::classify(&tagged.value),
            other => RawSpec::Literal(other),
        }
    }
}

/// Resolve the root entry of the model into a complete tree
pub fn resolve_document(
    store: &DefinitionStore,
    config: &ResolveConfig,
) -> Result<Node, ResolveError> {
    let mut resolver = Resolver::new(store, config);
    let root = resolver.resolve_root()?;

    let mut nodes = 0usize;
    root.walk(&mut |_| nodes += 1);
    info!(root = %config.root, nodes, "resolved document");

    Ok(root)
}

/// One resolution pass over a definition store
pub struct Resolver<'s> {
    store: &'s DefinitionStore,
    config: &'s ResolveConfig,
    names: NameGenerator,
    /// Definitions currently being expanded, outermost first
    chain: Vec<(Source, String)>,
}

impl<'s> Resolver<'s> {
    pub fn new(store: &'s DefinitionStore, config: &'s ResolveConfig) -> Self {
        Self {
            store,
            config,
            names: NameGenerator::new(),
            chain: Vec::new(),
        }
    }

    pub fn names(&self) -> &NameGenerator {
        &self.names
    }

    /// Resolve the configured root entry of the model table
    pub fn resolve_root(&mut self) -> Result<Node, ResolveError> {
        let store = self.store;
        let config = self.config;
        let root = config.root.as_str();
        let spec = store.model(root).ok_or_else(|| ResolveError::MissingRoot {
            root: root.to_string(),
        })?;
        self.expand(None, Source::Model, root, spec, NodeKind::Object)
    }

    /// Turn one raw specification into a node.
    ///
    /// `parent` is the attribute set of the node being built one level up;
    /// it is only consulted for inheritance.
    pub fn resolve(
        &mut self,
        parent: Option<&Attributes>,
        spec: &Value,
        kind: NodeKind,
    ) -> Result<Node, ResolveError> {
        match RawSpec::classify(spec) {
            RawSpec::Literal(value) => {
                let name = self.names.next(kind);
                trace!(node = %name, "literal leaf");
                Ok(Node::new(name, kind).with_content(Content::Single(Unit::Text(scalar_text(value)))))
            }
            RawSpec::Sequence(items) => {
                let name = self.names.next(kind);
                let attributes = self.merge(parent, &Attributes::new());
                let content = self.resolve_sequence(&attributes, items)?;
                Ok(Node::new(name, kind)
                    .with_attributes(attributes)
                    .with_content(content))
            }
            RawSpec::Mapping(mapping) => self.resolve_mapping(parent, mapping, kind),
        }
    }

    fn resolve_mapping(
        &mut self,
        parent: Option<&Attributes>,
        mapping: &Mapping,
        kind: NodeKind,
    ) -> Result<Node, ResolveError> {
        let name = match mapping.get("name").filter(|name| !name.is_null()) {
            Some(explicit) => scalar_text(explicit),
            None => self.names.next(kind),
        };

        let mut own = Attributes::with_capacity(mapping.len());
        for (key, value) in mapping {
            let Some(key) = key_text(key) else {
                debug!(node = %name, kind = value_kind(key), "ignoring non-scalar attribute key");
                continue;
            };
            if !RESERVED_KEYS.contains(&key.as_str()) {
                own.insert(key, value.clone());
            }
        }
        let attributes = self.merge(parent, &own);

        let template = match mapping.get("layout") {
            Some(layout) => Some(self.bind_template(&name, layout)?),
            None => None,
        };

        let content = match mapping.get("inner") {
            Some(inner) => self.resolve_inner(&attributes, inner)?,
            None => Content::Empty,
        };

        debug!(
            node = %name,
            kind = kind.prefix(),
            attributes = attributes.len(),
            units = content.units().len(),
            "resolved node"
        );

        let mut node = Node::new(name, kind)
            .with_attributes(attributes)
            .with_content(content);
        node.template = template;
        Ok(node)
    }

    /// Expand a named table entry, guarding against self-reference
    fn expand(
        &mut self,
        parent: Option<&Attributes>,
        source: Source,
        name: &str,
        spec: &Value,
        kind: NodeKind,
    ) -> Result<Node, ResolveError> {
        if self.chain.iter().any(|(s, n)| *s == source && n == name) {
            let mut chain: Vec<String> = self.chain.iter().map(|(_, n)| n.clone()).collect();
            chain.push(name.to_string());
            return Err(ResolveError::circular(chain));
        }

        self.chain.push((source, name.to_string()));
        let result = self.resolve(parent, spec, kind);
        self.chain.pop();

        Ok(result?.with_source(name))
    }

    fn bind_template(&self, node: &str, layout: &Value) -> Result<Template, ResolveError> {
        let layout = scalar_text(layout);
        match self.store.layout(&layout) {
            Some(Value::String(text)) => Ok(Template {
                layout,
                text: text.clone(),
            }),
            Some(other) => Err(ResolveError::InvalidTemplate {
                layout,
                node: node.to_string(),
                found: value_kind(other),
            }),
            None => Err(ResolveError::layout_not_found(layout, node)),
        }
    }

    fn resolve_inner(&mut self, parent: &Attributes, inner: &Value) -> Result<Content, ResolveError> {
        match inner {
            Value::Null => Ok(Content::Empty),
            Value::Sequence(items) => self.resolve_sequence(parent, items),
            single => Ok(Content::Single(self.resolve_unit(parent, single)?)),
        }
    }

    fn resolve_sequence(&mut self, parent: &Attributes, items: &[Value]) -> Result<Content, ResolveError> {
        let mut units = Vec::with_capacity(items.len());
        self.collect_units(parent, items, &mut units)?;
        Ok(Content::Sequence(units))
    }

    /// Nested sequences are flattened in place
    fn collect_units(
        &mut self,
        parent: &Attributes,
        items: &[Value],
        units: &mut Vec<Unit>,
    ) -> Result<(), ResolveError> {
        for item in items {
            match item {
                Value::Sequence(nested) => self.collect_units(parent, nested, units)?,
                element => units.push(self.resolve_unit(parent, element)?),
            }
        }
        Ok(())
    }

    fn resolve_unit(&mut self, parent: &Attributes, element: &Value) -> Result<Unit, ResolveError> {
        if let Some((reference, overrides)) = as_overlay(element) {
            return self.resolve_overlay(parent, reference, overrides);
        }

        match element {
            Value::String(name) => self.resolve_name(parent, name, None),
            Value::Mapping(_) => Ok(Unit::node(self.resolve(Some(parent), element, NodeKind::Object)?)),
            Value::Tagged(tagged) => self.resolve_unit(parent, &tagged.value),
            other => Ok(Unit::Text(scalar_text(other))),
        }
    }

    /// Look a name up in the tables; unknown names stay literal text
    fn resolve_name(
        &mut self,
        parent: &Attributes,
        name: &str,
        kind: Option<NodeKind>,
    ) -> Result<Unit, ResolveError> {
        let store = self.store;
        let Some((source, spec)) = store.lookup(name) else {
            trace!(reference = name, "no definition, keeping literal text");
            return Ok(Unit::text(name));
        };

        let kind = kind.unwrap_or(match source {
            Source::Model => NodeKind::Object,
            Source::Components => NodeKind::Component,
            Source::Layouts => NodeKind::Layout,
        });
        let node = self.expand(Some(parent), source, name, spec, kind)?;
        Ok(Unit::node(node))
    }

    /// `{reference: {key: value, ...}}`: expand the reference, then
    /// overwrite its attributes with the given values
    fn resolve_overlay(
        &mut self,
        parent: &Attributes,
        reference: &str,
        overrides: &Mapping,
    ) -> Result<Unit, ResolveError> {
        let mut node = match self.resolve_name(parent, reference, Some(NodeKind::Reference))? {
            Unit::Node(node) => node,
            text => {
                debug!(reference, "override target has no definition, overrides dropped");
                return Ok(text);
            }
        };

        for (key, value) in overrides {
            let Some(key) = key_text(key) else {
                continue;
            };
            let key = strip_marker(&key, &self.config.marker);
            if RESERVED_KEYS.contains(&key) {
                continue;
            }
            node.attributes.insert(key.to_owned(), value.clone());
        }

        debug!(node = %node.name, reference, overrides = overrides.len(), "applied inline overrides");
        Ok(Unit::Node(node))
    }

    fn merge(&self, parent: Option<&Attributes>, own: &Attributes) -> Attributes {
        merge_attributes(parent, own, &self.config.marker, self.config.inheritance)
    }
}

/// Match the `{reference: {overrides}}` shorthand
fn as_overlay(value: &Value) -> Option<(&str, &Mapping)> {
    let Value::Mapping(mapping) = value else {
        return None;
    };
    if mapping.len() != 1 {
        return None;
    }
    let (Value::String(reference), Value::Mapping(overrides)) = mapping.iter().next()? else {
        return None;
    };
    if RESERVED_KEYS.contains(&reference.as_str()) {
        return None;
    }
    Some((reference.as_str(), overrides))
}

/// Text of a scalar as it should appear in output
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        structured => serde_yaml::to_string(structured)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}
