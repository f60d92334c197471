use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::io::{json_stems, subdirectories};
use crate::config::{AnalysisConfig, resolve_base_dir};
use crate::error::{AnalysisError, Result};

/// Final path segment the resource directory must carry.
pub const LOCALES_DIR_NAME: &str = "locales";

/// Resolves locale directories and namespace files under `<base_dir>`.
///
/// Layout: `<base_dir>/<locale>/<namespace>.json`.
#[derive(Debug, Clone)]
pub struct ResourceLocator {
    base_dir: PathBuf,
    primary_locale: Option<String>,
    valid: bool,
}

impl ResourceLocator {
    pub fn new(project_root: &Path, config: &AnalysisConfig) -> Self {
        let base_dir = resolve_base_dir(project_root, &config.base_dir);
        let valid = is_valid_base_dir(&base_dir);
        Self {
            base_dir,
            primary_locale: config.primary_locale().map(str::to_string),
            valid,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The base directory exists and is named `locales`.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn locales(&self) -> BTreeSet<String> {
        subdirectories(&self.base_dir)
    }

    /// Every namespace declared by at least one locale.
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces = BTreeSet::new();
        for locale in self.locales() {
            namespaces.extend(json_stems(&self.base_dir.join(&locale)));
        }
        namespaces.into_iter().collect()
    }

    /// `<base_dir>/<locale>/<namespace>` for the primary locale, or the first
    /// locale directory when no primary locale is configured.
    pub fn namespace_path(&self, namespace: &str) -> Result<PathBuf> {
        let locale = match &self.primary_locale {
            Some(locale) => locale.clone(),
            None => self
                .locales()
                .into_iter()
                .next()
                .ok_or_else(|| AnalysisError::NoLocales {
                    base_dir: self.base_dir.clone(),
                })?,
        };
        Ok(self.base_dir.join(locale).join(namespace))
    }

    /// Path of the namespace's JSON file.
    pub fn namespace_file(&self, namespace: &str) -> Result<PathBuf> {
        let mut path = self.namespace_path(namespace)?.into_os_string();
        path.push(".json");
        Ok(PathBuf::from(path))
    }
}

fn is_valid_base_dir(base_dir: &Path) -> bool {
    base_dir.is_dir() && base_dir.file_name().and_then(|n| n.to_str()) == Some(LOCALES_DIR_NAME)
}
