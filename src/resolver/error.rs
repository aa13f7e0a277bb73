//! Error types for resolution

use thiserror::Error;

/// Fatal configuration errors; any of these aborts the whole pass
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The model has no entry for the document root
    #[error("root element '{root}' not found in the model definitions")]
    MissingRoot { root: String },

    /// A `layout` attribute names no layout entry
    #[error("layout '{layout}' not found in layout definitions (used by '{node}')")]
    LayoutNotFound { layout: String, node: String },

    /// A `layout` attribute names an entry that is not template text
    #[error("layout '{layout}' is a {found}, not template text (used by '{node}')")]
    InvalidTemplate {
        layout: String,
        node: String,
        found: &'static str,
    },

    /// A definition that expands into itself
    #[error("circular reference detected: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<String> },
}

impl ResolveError {
    pub fn layout_not_found(layout: impl Into<String>, node: impl Into<String>) -> Self {
        Self::LayoutNotFound {
            layout: layout.into(),
            node: node.into(),
        }
    }

    pub fn circular(chain: Vec<String>) -> Self {
        Self::CircularReference { chain }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_not_found_display() {
        let err = ResolveError::layout_not_found("nonexistent", "object_1");
        let text = err.to_string();
        assert!(text.contains("'nonexistent'"));
        assert!(text.contains("object_1"));
    }

    #[test]
    fn test_circular_display() {
        let err = ResolveError::circular(vec!["main".into(), "a".into(), "main".into()]);
        assert!(err.to_string().contains("main -> a -> main"));
    }
}
