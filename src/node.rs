//! Resolved node tree

use std::cell::OnceCell;

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

/// Attribute set of a node, in declaration order
pub type Attributes = IndexMap<String, Value>;

/// Keys of a raw specification that never become attributes
pub const RESERVED_KEYS: [&str; 3] = ["name", "inner", "layout"];

/// How a node came into existence; drives auto-naming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Model entry, inline mapping, or the root
    Object,
    /// Expansion of a component-table entry
    Component,
    /// Expansion of a layout-table entry
    Layout,
    /// Reference expanded with inline overrides
    Reference,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Object,
        NodeKind::Component,
        NodeKind::Layout,
        NodeKind::Reference,
    ];

    /// Prefix used for generated names (`object_1`, `component_2`, ...)
    pub fn prefix(self) -> &'static str {
        match self {
            NodeKind::Object => "object",
            NodeKind::Component => "component",
            NodeKind::Layout => "layout",
            NodeKind::Reference => "reference",
        }
    }
}

/// One element of a node's inner content
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Unit {
    /// Literal text, including names that matched no definition
    Text(String),
    Node(Box<Node>),
}

impl Unit {
    pub fn text(text: impl Into<String>) -> Self {
        Unit::Text(text.into())
    }

    pub fn node(node: Node) -> Self {
        Unit::Node(Box::new(node))
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Unit::Node(node) => Some(node),
            Unit::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Unit::Text(text) => Some(text),
            Unit::Node(_) => None,
        }
    }
}

/// Inner content of a node
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Content {
    #[default]
    Empty,
    Single(Unit),
    /// Ordered children; rendered by plain concatenation
    Sequence(Vec<Unit>),
}

impl Content {
    /// All units, in order
    pub fn units(&self) -> &[Unit] {
        match self {
            Content::Empty => &[],
            Content::Single(unit) => std::slice::from_ref(unit),
            Content::Sequence(units) => units,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.units().is_empty()
    }
}

/// Template text bound to a node through its `layout` attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Layout-table entry the text came from
    pub layout: String,
    pub text: String,
}

/// A concrete node produced by the resolver
///
/// Nodes are immutable once the resolver hands them out, apart from the
/// rendered-text cache filled by the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) kind: NodeKind,
    /// Table key this node was expanded from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) source: Option<String>,
    pub(crate) attributes: Attributes,
    #[serde(rename = "inner")]
    pub(crate) content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) template: Option<Template>,
    #[serde(skip)]
    pub(crate) rendered: OnceCell<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            source: None,
            attributes: Attributes::new(),
            content: Content::Empty,
            template: None,
            rendered: OnceCell::new(),
        }
    }

    /// A node holding nothing but literal text
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Object).with_content(Content::Single(Unit::text(text)))
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.content = content;
        self
    }

    pub fn with_template(mut self, layout: impl Into<String>, text: impl Into<String>) -> Self {
        self.template = Some(Template {
            layout: layout.into(),
            text: text.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn template(&self) -> Option<&Template> {
        self.template.as_ref()
    }

    /// Child nodes, skipping literal text
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.content.units().iter().filter_map(Unit::as_node)
    }

    /// Rendered text, once the renderer has visited this node
    pub fn rendered(&self) -> Option<&str> {
        self.rendered.get().map(String::as_str)
    }

    /// Depth-first search by node name, including this node
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children().find_map(|child| child.find(name))
    }

    /// Visit this node and all descendants depth-first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}
