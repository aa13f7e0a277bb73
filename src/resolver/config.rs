//! Configuration for the resolver

use serde::Deserialize;

use super::inherit::InheritancePolicy;

/// Options for one resolution pass
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
    /// Model entry the document starts from
    pub root: String,

    /// Key prefix that blocks inheritance of the unprefixed key
    pub marker: String,

    /// Who wins when parent and child both declare a key
    pub inheritance: InheritancePolicy,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            root: "main".to_string(),
            marker: "~".to_string(),
            inheritance: InheritancePolicy::default(),
        }
    }
}

impl ResolveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_inheritance(mut self, policy: InheritancePolicy) -> Self {
        self.inheritance = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolveConfig::default();
        assert_eq!(config.root, "main");
        assert_eq!(config.marker, "~");
        assert_eq!(config.inheritance, InheritancePolicy::ChildWins);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResolveConfig::new()
            .with_root("index")
            .with_marker("!")
            .with_inheritance(InheritancePolicy::ParentWins);

        assert_eq!(config.root, "index");
        assert_eq!(config.marker, "!");
        assert_eq!(config.inheritance, InheritancePolicy::ParentWins);
    }
}
