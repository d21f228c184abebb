//! Tests for template loaders.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use malline::{Environment, Error, FileSystemLoader, Loader, MemoryLoader, context};
use tempfile::TempDir;

fn fixtures() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("test.html"), "Hello {{ target }}!").unwrap();
    fs::create_dir(dir.path().join("partials")).unwrap();
    fs::write(dir.path().join("partials/nav.html"), "nav").unwrap();
    dir
}

fn environment(dir: &Path) -> Environment {
    Environment::builder()
        .loader(Arc::new(FileSystemLoader::new([dir])))
        .build()
}

// =============================================================================
// FileSystemLoader
// =============================================================================

#[test]
fn loads_template_from_file() {
    let dir = fixtures();
    let env = environment(dir.path());

    let template = env.load_template("test.html").unwrap();
    assert_eq!(template.name(), Some("test.html"));
    assert_eq!(
        template.render(&env, context! { "target" => "World" }).unwrap(),
        "Hello World!"
    );
}

#[test]
fn loads_from_subdirectory() {
    let dir = fixtures();
    let loader = FileSystemLoader::new([dir.path()]);
    assert_eq!(loader.load("partials/nav.html").unwrap(), "nav");
    assert_eq!(loader.load("partials/../test.html").unwrap(), "Hello {{ target }}!");
}

#[test]
fn searches_base_paths_in_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(first.path().join("a.html"), "first a").unwrap();
    fs::write(second.path().join("a.html"), "second a").unwrap();
    fs::write(second.path().join("b.html"), "second b").unwrap();

    let loader = FileSystemLoader::new([first.path(), second.path()]);
    assert_eq!(loader.paths().len(), 2);
    assert_eq!(loader.load("a.html").unwrap(), "first a");
    assert_eq!(loader.load("b.html").unwrap(), "second b");
}

#[test]
fn missing_template_is_not_found() {
    let dir = fixtures();
    let env = environment(dir.path());

    let err = env.load_template("unknown.html").unwrap_err();
    assert!(err.is_not_found());
    assert!(
        err.to_string()
            .starts_with("template named `unknown.html` does not exist in loader"),
        "{err}"
    );
}

#[test]
fn missing_template_list_is_not_found() {
    let dir = fixtures();
    let env = environment(dir.path());

    let names = vec!["unknown.html".to_string(), "unknown2.html".to_string()];
    let err = env.load_first_template(&names).unwrap_err();
    assert!(matches!(&err, Error::NotFound { names: missing, .. } if missing == &names));
    assert!(
        err.to_string()
            .starts_with("template named `unknown.html, unknown2.html` does not exist"),
        "{err}"
    );
}

#[test]
fn loads_first_existing_template() {
    let dir = fixtures();
    let env = environment(dir.path());

    let names = vec!["unknown.html".to_string(), "test.html".to_string()];
    let template = env.load_first_template(&names).unwrap();
    assert_eq!(template.name(), Some("test.html"));
}

#[test]
fn rejects_absolute_paths() {
    let dir = fixtures();
    let env = environment(dir.path());

    let err = env.load_template("/etc/hosts").unwrap_err();
    assert!(err.is_security(), "{err}");
}

#[test]
fn rejects_paths_escaping_base() {
    let dir = fixtures();
    let env = environment(dir.path());

    let err = env.load_template("../secret.html").unwrap_err();
    assert!(err.is_security(), "{err}");
    assert!(err.to_string().contains("is located outside of base path"));

    let err = env.load_template("partials/../../secret.html").unwrap_err();
    assert!(err.is_security(), "{err}");
}

#[test]
fn security_errors_stop_the_search() {
    let dir = fixtures();
    let loader = FileSystemLoader::new([dir.path()]);

    let names = vec!["../secret.html".to_string(), "test.html".to_string()];
    let err = loader.load_first(&names).unwrap_err();
    assert!(err.is_security());
}

#[test]
fn directories_are_not_templates() {
    let dir = fixtures();
    let loader = FileSystemLoader::new([dir.path()]);
    assert!(loader.load("partials").unwrap_err().is_not_found());
}

// =============================================================================
// MemoryLoader
// =============================================================================

#[test]
fn memory_loader_serves_registered_sources() {
    let mut loader = MemoryLoader::new().with("a.html", "A");
    loader.insert("b.html", "B");

    assert_eq!(loader.load("a.html").unwrap(), "A");
    assert_eq!(loader.load("b.html").unwrap(), "B");
    assert!(loader.load("c.html").unwrap_err().is_not_found());
}

#[test]
fn memory_loader_collects_from_pairs() {
    let loader: MemoryLoader = [("a.html", "A"), ("b.html", "B")].into_iter().collect();
    let (name, source) = loader
        .load_first(&["missing.html".to_string(), "b.html".to_string()])
        .unwrap();
    assert_eq!(name, "b.html");
    assert_eq!(source, "B");
}

// =============================================================================
// No loader
// =============================================================================

#[test]
fn loading_without_a_loader_fails() {
    let err = Environment::new().load_template("test.html").unwrap_err();
    assert_eq!(
        err.to_string(),
        "template named `test.html` does not exist. No loaders found"
    );
}
