mod common;

use common::Project;
use i18n_lens::resource::{ResourceIndex, ResourceLocator};
use i18n_lens::{AnalysisConfig, AnalysisError};
use std::path::PathBuf;

#[test]
fn valid_when_base_dir_exists_and_is_named_locales() {
    let project = Project::standard();
    let locator = ResourceLocator::new(project.root(), &AnalysisConfig::new("locales"));
    assert!(locator.is_valid());
    assert_eq!(locator.base_dir(), project.root().join("locales"));
}

#[test]
fn invalid_when_base_dir_is_missing() {
    let project = Project::empty();
    let locator = ResourceLocator::new(project.root(), &AnalysisConfig::new("locales"));
    assert!(!locator.is_valid());
}

#[test]
fn invalid_when_base_dir_has_another_name() {
    let project = Project::empty();
    project.write("translations/en/common.json", "{}");
    let locator = ResourceLocator::new(project.root(), &AnalysisConfig::new("translations"));
    assert!(!locator.is_valid());
}

#[test]
fn absolute_base_dir_is_used_as_is() {
    let project = Project::standard();
    let absolute = project.root().join("locales");
    let config = AnalysisConfig::new(absolute.to_string_lossy());
    let locator = ResourceLocator::new(&PathBuf::from("/somewhere/else"), &config);
    assert!(locator.is_valid());
    assert_eq!(locator.base_dir(), absolute);
}

#[test]
fn namespaces_are_deduplicated_across_locales() {
    let project = Project::standard();
    project.write("locales/en/README.md", "not a namespace");
    project.mkdir("locales/en/nested.json");
    let locator = ResourceLocator::new(project.root(), &AnalysisConfig::new("locales"));
    assert_eq!(locator.namespaces(), vec!["common", "extra", "greetings"]);
}

#[test]
fn namespace_path_prefers_primary_locale() {
    let project = Project::standard();
    let config = AnalysisConfig::new("locales").with_primary_locale("en");
    let locator = ResourceLocator::new(project.root(), &config);
    let path = locator.namespace_path("common").expect("path should resolve");
    assert_eq!(path, project.root().join("locales").join("en").join("common"));
}

#[test]
fn namespace_path_falls_back_to_first_locale() {
    let project = Project::standard();
    let locator = ResourceLocator::new(project.root(), &AnalysisConfig::new("locales"));
    let path = locator.namespace_path("common").expect("path should resolve");
    assert_eq!(path, project.root().join("locales").join("de").join("common"));
}

#[test]
fn namespace_path_without_any_locale_is_an_error() {
    let project = Project::empty();
    project.mkdir("locales");
    let locator = ResourceLocator::new(project.root(), &AnalysisConfig::new("locales"));
    let err = locator.namespace_path("common").expect_err("no locale to pick");
    assert!(matches!(err, AnalysisError::NoLocales { .. }));
}

#[test]
fn namespace_file_keeps_dotted_namespace_names() {
    let project = Project::standard();
    let config = AnalysisConfig::new("locales").with_primary_locale("en");
    let locator = ResourceLocator::new(project.root(), &config);
    let path = locator.namespace_file("admin.v2").expect("path should resolve");
    assert_eq!(path, project.root().join("locales/en/admin.v2.json"));
}

#[test]
fn resource_index_lists_top_level_keys_in_order() {
    let project = Project::empty();
    project.write(
        "locales/en/common.json",
        r#"{"title": "T", "nav": {"home": "Home"}, "footer": "F"}"#,
    );
    let path = project.root().join("locales/en/common.json");
    let index = ResourceIndex::load(&path).expect("file exists");
    assert_eq!(index.path(), path.as_path());
    assert_eq!(index.symbols(), ["title", "nav", "footer"]);
    assert!(index.contains("nav"));
    assert!(!index.contains("home"));
}

#[test]
fn resource_index_is_absent_for_missing_or_empty_files() {
    let project = Project::empty();
    project.write("locales/en/empty.json", "");
    assert!(ResourceIndex::load(&project.root().join("locales/en/empty.json")).is_none());
    assert!(ResourceIndex::load(&project.root().join("locales/en/missing.json")).is_none());
}

#[test]
fn resource_index_recovers_keys_from_malformed_json() {
    let project = Project::empty();
    project.write("locales/en/broken.json", r#"{"ok": "yes", "partial": "#);
    let index = ResourceIndex::load(&project.root().join("locales/en/broken.json"))
        .expect("file exists");
    assert_eq!(index.symbols(), ["ok"]);
}

#[test]
fn required_symbols_of_missing_namespace_are_fatal() {
    let project = Project::standard();
    let context = project.context();
    let err = context.symbols("nope").expect_err("nope.json does not exist");
    match err {
        AnalysisError::ResourceUnavailable { namespace, path } => {
            assert_eq!(namespace, "nope");
            assert!(path.ends_with("locales/en/nope.json"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
