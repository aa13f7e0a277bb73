//! Loading definition sources from disk

use std::fs;
use std::path::Path;

use struge::{generate, DefinitionStore, LoadError, Source, SourcePaths};
use tempfile::TempDir;

fn paths_in(dir: &Path) -> SourcePaths {
    SourcePaths {
        project: dir.join("project.yaml"),
        components: dir.join("components.yaml"),
        implementation: dir.join("implementation.yaml"),
    }
}

fn write(dir: &Path, file: &str, text: &str) {
    fs::write(dir.join(file), text).expect("Should write fixture");
}

#[test]
fn test_load_all_sources() {
    let dir = TempDir::new().expect("Should create temp dir");
    write(dir.path(), "project.yaml", "main:\n  layout: wrap\n  inner: [badge]\n");
    write(dir.path(), "components.yaml", "badge: {layout: pill, label: new}\n");
    write(
        dir.path(),
        "implementation.yaml",
        "wrap: \"<div>{{inner}}</div>\"\npill: \"<span>{{item.label}}</span>\"\n",
    );

    let (store, diagnostics) = DefinitionStore::load(&paths_in(dir.path()));
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {:?}", diagnostics);
    assert_eq!(store.table(Source::Model).len(), 1);
    assert_eq!(store.table(Source::Components).len(), 1);
    assert_eq!(store.table(Source::Layouts).len(), 2);

    let html = generate(&store).expect("Should generate");
    assert_eq!(html, "<div><span>new</span></div>");
}

#[test]
fn test_missing_source_leaves_empty_table() {
    let dir = TempDir::new().expect("Should create temp dir");
    write(dir.path(), "project.yaml", "main: {inner: [hello, \" world\"]}\n");

    let (store, diagnostics) = DefinitionStore::load(&paths_in(dir.path()));
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.iter().all(LoadError::is_missing));
    assert!(store.table(Source::Components).is_empty());
    assert!(store.table(Source::Layouts).is_empty());

    assert_eq!(generate(&store).expect("Should generate"), "hello world");
}

#[test]
fn test_malformed_source_is_reported_with_location() {
    let dir = TempDir::new().expect("Should create temp dir");
    write(dir.path(), "project.yaml", "main:\n  inner: [a, b\n");
    write(dir.path(), "components.yaml", "");
    write(dir.path(), "implementation.yaml", "");

    let (store, diagnostics) = DefinitionStore::load(&paths_in(dir.path()));
    assert_eq!(diagnostics.len(), 1);

    let err = &diagnostics[0];
    assert!(matches!(err, LoadError::Yaml { .. }));
    assert!(!err.is_missing());
    assert!(err.span().is_some());
    assert_eq!(err.path(), dir.path().join("project.yaml").as_path());
    assert!(store.table(Source::Model).is_empty());
}

#[test]
fn test_top_level_sequence_is_rejected() {
    let dir = TempDir::new().expect("Should create temp dir");
    write(dir.path(), "project.yaml", "main: {}\n");
    write(dir.path(), "components.yaml", "- not\n- a\n- table\n");
    write(dir.path(), "implementation.yaml", "");

    let (store, diagnostics) = DefinitionStore::load(&paths_in(dir.path()));
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(diagnostics[0], LoadError::NotAMapping { found: "sequence", .. }));
    assert!(store.table(Source::Components).is_empty());
    assert_eq!(store.table(Source::Model).len(), 1);
}
