// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use rstest::rstest;
use std::io::Write;

fn catalog_with(key: &str, template: &str) -> StringCatalog {
    StringCatalog::new(MapProvider::new().with(key, template))
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// =========================================================================
// Substitution
// =========================================================================

#[rstest]
#[case("Exit code {0}", &["1"], "Exit code 1")]
#[case("{1} then {0}", &["a", "b"], "b then a")]
#[case("{0}{0}", &["x"], "xx")]
#[case("{ 0 }", &["x"], "x")]
#[case("It''s {0}", &["here"], "It's here")]
#[case("'{0}' is literal, {0} is not", &["v"], "{0} is literal, v is not")]
#[case("missing {3}", &["a"], "missing {3}")]
#[case("code {0}: {1}", &["1", ""], "code 1: ")]
fn test_format_substitutes(#[case] template: &str, #[case] values: &[&str], #[case] expected: &str) {
    let catalog = catalog_with("k", template);
    assert_eq!(catalog.format("k", &args(values)).unwrap(), expected);
}

#[test]
fn test_format_without_args_returns_template_unchanged() {
    let catalog = catalog_with("k", "It''s {0}");
    assert_eq!(catalog.format("k", &[]).unwrap(), "It''s {0}");
}

#[rstest]
#[case("broken {0")]
#[case("bad {x}")]
#[case("open 'quote")]
fn test_format_malformed_template(#[case] template: &str) {
    let catalog = catalog_with("k", template);
    let err = catalog.format("k", &args(&["v"])).unwrap_err();
    assert!(matches!(err, CatalogError::Malformed { ref key, .. } if key == "k"));
}

// =========================================================================
// Lookup failures
// =========================================================================

#[test]
fn test_unknown_key() {
    let catalog = catalog_with("k", "v");
    let err = catalog.format("other", &[]).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownKey(ref k) if k == "other"));
}

#[test]
fn test_empty_key_rejected() {
    let catalog = catalog_with("", "v");
    assert!(matches!(catalog.template(""), Err(CatalogError::EmptyKey)));
    assert!(matches!(catalog.message(""), Err(CatalogError::EmptyKey)));
}

// =========================================================================
// Providers
// =========================================================================

#[test]
fn test_default_bundle_has_verifier_keys() {
    let catalog = StringCatalog::bundled().unwrap();
    for key in [
        "error.command-failed-unexpected-exit-code",
        "error.command-failed-unexpected-output",
        "message.failed-command-output-header",
    ] {
        assert!(catalog.template(key).is_ok(), "missing {key}");
    }
    assert_eq!(
        catalog.format("message.failed-command-output-header", &[]).unwrap(),
        "Output of failed command:"
    );
}

#[test]
fn test_map_provider_from_json() {
    let provider = MapProvider::from_json_str(r#"{"greeting": "Hello {0}"}"#).unwrap();
    assert_eq!(provider.len(), 1);
    let catalog = StringCatalog::new(provider);
    assert_eq!(catalog.format("greeting", &args(&["you"])).unwrap(), "Hello you");
}

#[test]
fn test_map_provider_rejects_non_string_values() {
    assert!(matches!(
        MapProvider::from_toml_str("key = 1"),
        Err(CatalogError::Toml(_))
    ));
}

#[test]
fn test_layered_provider_first_layer_wins() {
    let layered = LayeredProvider::new()
        .layer(MapProvider::new().with("a", "override"))
        .layer(MapProvider::new().with("a", "base").with("b", "base b"));
    assert_eq!(layered.len(), 2);
    assert_eq!(layered.template("a").unwrap(), "override");
    assert_eq!(layered.template("b").unwrap(), "base b");
    assert!(matches!(
        layered.template("c"),
        Err(CatalogError::UnknownKey(_))
    ));
}

#[test]
fn test_layered_provider_stops_on_load_error() {
    let layered = LayeredProvider::new()
        .layer(FileProvider::new("/nonexistent/outcheck/messages.toml"))
        .layer(MapProvider::new().with("a", "base"));
    assert!(matches!(
        layered.template("a"),
        Err(CatalogError::Read { .. })
    ));
}

#[test]
fn test_file_provider_loads_toml_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("messages.toml");
    let provider = FileProvider::new(&path);

    // Missing file is only reported on lookup
    assert!(matches!(provider.template("k"), Err(CatalogError::Read { .. })));

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, r#""k" = "loaded {{0}}""#).unwrap();
    drop(file);

    assert_eq!(provider.template("k").unwrap(), "loaded {0}");

    // Cached after the first successful load
    std::fs::remove_file(&path).unwrap();
    assert_eq!(provider.template("k").unwrap(), "loaded {0}");
}

#[test]
fn test_file_provider_json_by_extension() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{"k": "from json"}"#).unwrap();
    file.flush().unwrap();

    let provider = FileProvider::new(file.path());
    assert_eq!(provider.template("k").unwrap(), "from json");
}

#[test]
fn test_formatter_is_bound_to_catalog() {
    let catalog = catalog_with("k", "v={0}");
    let format = catalog.formatter();
    assert_eq!(format("k", &args(&["1"])).unwrap(), "v=1");
}
