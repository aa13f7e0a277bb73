//! Configuration for document rendering

use serde::Deserialize;

/// Configuration options for template evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Treat lookups of undefined template variables as errors
    pub strict: bool,

    /// HTML-escape substituted values (off: values are inserted verbatim)
    pub escape_html: bool,
}

impl RenderConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict variable lookup
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set HTML escaping of substituted values
    pub fn with_escape_html(mut self, escape: bool) -> Self {
        self.escape_html = escape;
        self
    }
}
