//! Definition store: the three read-only lookup tables
//!
//! A document is described across three sources. The *model* holds instance
//! data (including the root entry), the *components* hold reusable named
//! fragments and the *layouts* hold named render templates. Name lookups
//! consult them in that order.

pub mod loader;

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use tracing::{debug, warn};

use crate::error::LoadError;

pub use loader::{load_table, parse_table};

/// One named-entry table, in source order
pub type Table = IndexMap<String, Value>;

/// Which table a definition came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Model,
    Components,
    Layouts,
}

impl Source {
    /// Lookup priority for bare name references
    pub const LOOKUP_ORDER: [Source; 3] = [Source::Model, Source::Components, Source::Layouts];

    pub fn label(self) -> &'static str {
        match self {
            Source::Model => "model",
            Source::Components => "components",
            Source::Layouts => "layouts",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// File locations of the three definition sources
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourcePaths {
    /// Main project file (model entries, including the root)
    pub project: PathBuf,
    /// Component library
    pub components: PathBuf,
    /// Layout library ("implementation" templates)
    pub implementation: PathBuf,
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            project: PathBuf::from("project.yaml"),
            components: PathBuf::from("components.yaml"),
            implementation: PathBuf::from("implementation.yaml"),
        }
    }
}

impl SourcePaths {
    pub fn path(&self, source: Source) -> &Path {
        match source {
            Source::Model => &self.project,
            Source::Components => &self.components,
            Source::Layouts => &self.implementation,
        }
    }
}

/// The three definition tables, read-only once built
#[derive(Debug, Default, Clone)]
pub struct DefinitionStore {
    model: Table,
    components: Table,
    layouts: Table,
}

impl DefinitionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already loaded tables
    pub fn from_tables(model: Table, components: Table, layouts: Table) -> Self {
        Self {
            model,
            components,
            layouts,
        }
    }

    /// Parse three YAML texts; unlike [`DefinitionStore::load`], any
    /// malformed text is reported as an error
    pub fn from_yaml_strs(model: &str, components: &str, layouts: &str) -> Result<Self, LoadError> {
        Ok(Self::from_tables(
            parse_table(model, Path::new("<model>"))?,
            parse_table(components, Path::new("<components>"))?,
            parse_table(layouts, Path::new("<layouts>"))?,
        ))
    }

    /// Load all three sources from disk.
    ///
    /// A source that is missing or malformed becomes an empty table; the
    /// failures are returned alongside the store so callers can report them.
    pub fn load(paths: &SourcePaths) -> (Self, Vec<LoadError>) {
        let mut store = Self::new();
        let mut diagnostics = Vec::new();

        for source in Source::LOOKUP_ORDER {
            let path = paths.path(source);
            match load_table(path) {
                Ok(table) => {
                    debug!(%source, path = %path.display(), entries = table.len(), "loaded definitions");
                    *store.table_mut(source) = table;
                }
                Err(err) => {
                    warn!(%source, error = %err, "definition source unavailable, using an empty table");
                    diagnostics.push(err);
                }
            }
        }

        (store, diagnostics)
    }

    pub fn table(&self, source: Source) -> &Table {
        match source {
            Source::Model => &self.model,
            Source::Components => &self.components,
            Source::Layouts => &self.layouts,
        }
    }

    fn table_mut(&mut self, source: Source) -> &mut Table {
        match source {
            Source::Model => &mut self.model,
            Source::Components => &mut self.components,
            Source::Layouts => &mut self.layouts,
        }
    }

    pub fn model(&self, name: &str) -> Option<&Value> {
        self.model.get(name)
    }

    pub fn component(&self, name: &str) -> Option<&Value> {
        self.components.get(name)
    }

    pub fn layout(&self, name: &str) -> Option<&Value> {
        self.layouts.get(name)
    }

    /// Find a name in the first table that defines it
    pub fn lookup(&self, name: &str) -> Option<(Source, &Value)> {
        Source::LOOKUP_ORDER
            .into_iter()
            .find_map(|source| self.table(source).get(name).map(|spec| (source, spec)))
    }

    /// True when no table holds any entry
    pub fn is_empty(&self) -> bool {
        self.model.is_empty() && self.components.is_empty() && self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> DefinitionStore {
        DefinitionStore::from_yaml_strs(
            "main: {inner: card}\nshared: model\n",
            "card: {layout: card}\nshared: component\n",
            "card: \"<div>{{inner}}</div>\"\nshared: layout\n",
        )
        .expect("Should parse")
    }

    #[test]
    fn test_lookup_priority() {
        let store = store();
        let (source, spec) = store.lookup("shared").expect("Should find");
        assert_eq!(source, Source::Model);
        assert_eq!(spec.as_str(), Some("model"));

        let (source, _) = store.lookup("card").expect("Should find");
        assert_eq!(source, Source::Components);
    }

    #[test]
    fn test_lookup_per_table() {
        let store = store();
        assert!(store.model("main").is_some());
        assert!(store.component("main").is_none());
        assert_eq!(store.layout("shared").and_then(Value::as_str), Some("layout"));
        assert!(store.lookup("nowhere").is_none());
    }

    #[test]
    fn test_from_yaml_strs_rejects_malformed() {
        let result = DefinitionStore::from_yaml_strs("main: [", "", "");
        assert!(matches!(result, Err(LoadError::Yaml { .. })));
    }

    #[test]
    fn test_default_paths() {
        let paths = SourcePaths::default();
        assert_eq!(paths.path(Source::Model), Path::new("project.yaml"));
        assert_eq!(paths.path(Source::Components), Path::new("components.yaml"));
        assert_eq!(paths.path(Source::Layouts), Path::new("implementation.yaml"));
    }

    #[test]
    fn test_empty_store() {
        assert!(DefinitionStore::new().is_empty());
        assert!(!store().is_empty());
    }
}
