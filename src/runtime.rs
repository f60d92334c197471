//! Runtime lookup of translations from the `locales` directory.
//!
//! A [`Catalog`] is loaded once and read-only afterwards; callers keep it
//! alive and hand out [`Translator`]s that borrow from it.

use anyhow::{Result, bail};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::resource::LOCALES_DIR_NAME;
use crate::resource::io::read_json_file;
use crate::util::interpolate;

/// Namespaces a translator resolves keys against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Namespaces {
    /// Keys are looked up directly in this namespace.
    Single(String),
    /// Keys are written as `namespace:key`.
    Multiple(Vec<String>),
}

/// locale -> namespace -> parsed JSON document
#[derive(Debug, Default)]
pub struct Catalog {
    locales: BTreeMap<String, HashMap<String, Value>>,
}

impl Catalog {
    /// Load every `<base_dir>/**/<locale>/<namespace>.json`.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let is_locales_dir =
            base_dir.file_name().and_then(|n| n.to_str()) == Some(LOCALES_DIR_NAME);
        if !base_dir.is_absolute() || !is_locales_dir {
            bail!(
                "expected absolute path to locales folder, received: {}",
                base_dir.display()
            );
        }

        let mut catalog = Self::default();
        for entry in ignore::WalkBuilder::new(base_dir).build() {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let locale = path
                .parent()
                .and_then(|dir| dir.file_name())
                .and_then(|n| n.to_str());
            let namespace = path.file_stem().and_then(|n| n.to_str());
            let (Some(locale), Some(namespace)) = (locale, namespace) else {
                continue;
            };

            let document = read_json_file(path)?;
            catalog
                .locales
                .entry(locale.to_string())
                .or_default()
                .insert(namespace.to_string(), document);
        }

        tracing::debug!(locales = catalog.locales.len(), "translation catalog loaded");
        Ok(catalog)
    }

    /// Load only `<base_dir>/<locale>/<namespace>.json` for the given
    /// namespaces. Every requested file must exist.
    pub fn load_bundle(base_dir: &Path, locale: &str, namespaces: &[&str]) -> Result<Self> {
        let dir = base_dir.join(locale);
        let mut resources = HashMap::with_capacity(namespaces.len());
        for &namespace in namespaces {
            let path = dir.join(format!("{namespace}.json"));
            if !path.is_file() {
                bail!("no resource file for namespace {} at {}", namespace, path.display());
            }
            resources.insert(namespace.to_string(), read_json_file(&path)?);
        }

        tracing::debug!(locale, namespaces = resources.len(), "translation bundle loaded");
        let mut catalog = Self::default();
        catalog.locales.insert(locale.to_string(), resources);
        Ok(catalog)
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    pub fn translator(&self, locale: &str, namespaces: Namespaces) -> Result<Translator<'_>> {
        let Some(resources) = self.locales.get(locale) else {
            bail!("no resources loaded for language {}", locale);
        };
        Ok(Translator {
            resources,
            namespaces,
        })
    }
}

pub struct Translator<'c> {
    resources: &'c HashMap<String, Value>,
    namespaces: Namespaces,
}

impl Translator<'_> {
    /// Translate `key`, falling back to the key itself when nothing matches.
    pub fn t(&self, key: &str, interpolation: Option<&Map<String, Value>>) -> String {
        let translation = self.lookup(key).unwrap_or(key);
        match interpolation {
            Some(values) => interpolate(translation, values),
            None => translation.to_string(),
        }
    }

    fn lookup<'k>(&'k self, key: &'k str) -> Option<&'k str> {
        let (namespace, key) = match &self.namespaces {
            Namespaces::Single(namespace) => (namespace.as_str(), key),
            Namespaces::Multiple(_) => {
                let mut parts = key.split(':');
                match (parts.next(), parts.next()) {
                    (Some(ns), Some(key)) if !ns.is_empty() && !key.is_empty() => (ns, key),
                    _ => return None,
                }
            }
        };
        self.resources.get(namespace)?.get(key)?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    fn catalog() -> (tempfile::TempDir, Catalog) {
        let dir = tempfile::tempdir().expect("temp dir");
        let base = dir.path().join("locales");
        fs::create_dir_all(base.join("en")).expect("create en");
        fs::create_dir_all(base.join("de")).expect("create de");
        fs::write(
            base.join("en/common.json"),
            r#"{"hello": "Hello {{name}}", "count": 3}"#,
        )
        .expect("write en/common");
        fs::write(base.join("en/greetings.json"), r#"{"bye": "Goodbye"}"#)
            .expect("write en/greetings");
        fs::write(base.join("de/common.json"), r#"{"hello": "Hallo {{name}}"}"#)
            .expect("write de/common");
        let catalog = Catalog::load(&base).expect("catalog should load");
        (dir, catalog)
    }

    #[test]
    fn rejects_directories_not_named_locales() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(Catalog::load(dir.path()).is_err());
        assert!(Catalog::load(Path::new("locales")).is_err());
    }

    #[test]
    fn single_namespace_lookup_with_interpolation() {
        let (_dir, catalog) = catalog();
        let t = catalog
            .translator("de", Namespaces::Single("common".into()))
            .expect("de is loaded");
        let values = json!({ "name": "Ada" });
        assert_eq!(t.t("hello", values.as_object()), "Hallo Ada");
        assert_eq!(t.t("missing", None), "missing");
    }

    #[test]
    fn multiple_namespaces_need_prefixed_keys() {
        let (_dir, catalog) = catalog();
        let t = catalog
            .translator(
                "en",
                Namespaces::Multiple(vec!["common".into(), "greetings".into()]),
            )
            .expect("en is loaded");
        assert_eq!(t.t("greetings:bye", None), "Goodbye");
        assert_eq!(t.t("bye", None), "bye");
        assert_eq!(t.t(":bye", None), ":bye");
        assert_eq!(t.t("common:count", None), "common:count");
    }

    #[test]
    fn unknown_locale_is_an_error() {
        let (_dir, catalog) = catalog();
        assert_eq!(catalog.locales().collect::<Vec<_>>(), vec!["de", "en"]);
        assert!(catalog.translator("fr", Namespaces::Single("common".into())).is_err());
    }

    #[test]
    fn bundle_loads_only_requested_namespaces() {
        let (dir, _) = catalog();
        let base = dir.path().join("locales");

        let bundle = Catalog::load_bundle(&base, "en", &["greetings"]).expect("bundle loads");
        assert_eq!(bundle.locales().collect::<Vec<_>>(), vec!["en"]);
        let t = bundle
            .translator("en", Namespaces::Multiple(vec!["common".into(), "greetings".into()]))
            .expect("en is loaded");
        assert_eq!(t.t("greetings:bye", None), "Goodbye");
        assert_eq!(t.t("common:hello", None), "common:hello");

        assert!(Catalog::load_bundle(&base, "de", &["greetings"]).is_err());
        assert!(Catalog::load_bundle(&base, "de", &[]).is_ok());
    }
}
