#![allow(dead_code)]

use i18n_lens::{AnalysisConfig, AnalysisContext, Document};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const COMMON_EN: &str = r#"{"hello": "Hello", "bye": "Bye"}"#;
pub const GREETINGS_EN: &str = r#"{"hello": "Hi there", "welcome": "Welcome {{name}}"}"#;
pub const COMMON_DE: &str = r#"{"hello": "Hallo", "bye": "Tschüss"}"#;
pub const EXTRA_DE: &str = r#"{"only_de": "Nur Deutsch"}"#;

/// A throwaway project directory with a `locales` tree.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp directory"),
        }
    }

    /// `locales/{en,de}` with `common` in both, `greetings` in `en` and
    /// `extra` in `de`.
    pub fn standard() -> Self {
        let project = Self::empty();
        project.write("locales/en/common.json", COMMON_EN);
        project.write("locales/en/greetings.json", GREETINGS_EN);
        project.write("locales/de/common.json", COMMON_DE);
        project.write("locales/de/extra.json", EXTRA_DE);
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directory");
        }
        fs::write(path, content).expect("failed to write file");
    }

    pub fn mkdir(&self, relative: &str) {
        fs::create_dir_all(self.root().join(relative)).expect("failed to create directory");
    }

    pub fn context_with(&self, config: AnalysisConfig) -> AnalysisContext {
        AnalysisContext::new(self.root(), config)
    }

    /// `base_dir = "locales"`, primary locale `en`.
    pub fn context(&self) -> AnalysisContext {
        self.context_with(AnalysisConfig::new("locales").with_primary_locale("en"))
    }
}

pub fn document(source: &str) -> Document {
    Document::new("src/App.tsx", source, "tsx")
}

/// Character offset just after the first occurrence of `needle`.
pub fn offset_after(source: &str, needle: &str) -> usize {
    let byte = source.find(needle).expect("needle should occur in source") + needle.len();
    source[..byte].chars().count()
}

/// Character offset of the first occurrence of `needle`.
pub fn offset_of(source: &str, needle: &str) -> usize {
    let byte = source.find(needle).expect("needle should occur in source");
    source[..byte].chars().count()
}
