//! Error types for loading definition sources

use std::io;
use std::path::{Path, PathBuf};

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// A definition source that could not be turned into a table.
///
/// These never abort a run: the store records them and falls back to an
/// empty table for the affected source.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{} must hold a mapping at the top level, found {found}", path.display())]
    NotAMapping { path: PathBuf, found: &'static str },
}

impl LoadError {
    /// Path of the source that failed
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::Yaml { path, .. }
            | LoadError::NotAMapping { path, .. } => path,
        }
    }

    /// True when the source file simply does not exist
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Byte offset of a YAML syntax error, if known
    pub fn span(&self) -> Option<Span> {
        match self {
            LoadError::Yaml { source, .. } => source.location().map(|loc| {
                let start = loc.index();
                start..start + 1
            }),
            _ => None,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return format!("{}\n", self);
        };
        let end = span.end.min(source.len());
        let span = span.start.min(end)..end;

        let message = match self {
            LoadError::Yaml { source, .. } => source.to_string(),
            other => other.to_string(),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message("malformed definition source")
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}\n", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml_error(text: &str) -> LoadError {
        let source = serde_yaml::from_str::<serde_yaml::Value>(text).unwrap_err();
        LoadError::Yaml {
            path: PathBuf::from("project.yaml"),
            source,
        }
    }

    #[test]
    fn test_missing_file_is_detected() {
        let err = LoadError::Io {
            path: PathBuf::from("components.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.is_missing());
        assert!(err.to_string().contains("components.yaml"));
        assert_eq!(err.path(), Path::new("components.yaml"));
    }

    #[test]
    fn test_not_a_mapping_display() {
        let err = LoadError::NotAMapping {
            path: PathBuf::from("implementation.yaml"),
            found: "sequence",
        };
        assert!(!err.is_missing());
        assert!(err.to_string().contains("found sequence"));
    }

    #[test]
    fn test_yaml_error_has_span() {
        let err = yaml_error("main:\n  inner: [a, b\n");
        assert!(err.span().is_some());
    }

    #[test]
    fn test_format_with_source_context() {
        let text = "main:\n  inner: [a, b\n";
        let report = yaml_error(text).format(text, "project.yaml");
        assert!(report.contains("project.yaml"));
        assert!(report.contains("malformed definition source"));
    }

    #[test]
    fn test_format_without_span_falls_back_to_display() {
        let err = LoadError::NotAMapping {
            path: PathBuf::from("x.yaml"),
            found: "string",
        };
        assert_eq!(err.format("hello", "x.yaml"), format!("{}\n", err));
    }
}
