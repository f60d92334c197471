use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

pub const DEFAULT_CALL_EXPRESSION_ID: &str = "useTranslation";
pub const DEFAULT_BINDING_ELEMENT_ID: &str = "t";

/// Per-project settings, fixed once the project is loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    pub base_dir: String,
    #[serde(default)]
    pub primary_locale: Option<String>,
    #[serde(default = "default_call_expression_id")]
    pub call_expression_id: String,
    #[serde(default = "default_binding_element_id")]
    pub binding_element_id: String,
}

fn default_call_expression_id() -> String {
    DEFAULT_CALL_EXPRESSION_ID.to_string()
}

fn default_binding_element_id() -> String {
    DEFAULT_BINDING_ELEMENT_ID.to_string()
}

impl AnalysisConfig {
    pub fn new(base_dir: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            primary_locale: None,
            call_expression_id: default_call_expression_id(),
            binding_element_id: default_binding_element_id(),
        }
    }

    pub fn with_primary_locale(mut self, locale: impl Into<String>) -> Self {
        self.primary_locale = Some(locale.into());
        self
    }

    /// An empty primary locale counts as unset.
    pub fn primary_locale(&self) -> Option<&str> {
        self.primary_locale.as_deref().filter(|l| !l.is_empty())
    }
}

/// Resolve the configured resource directory against the project root.
pub fn resolve_base_dir(project_root: &Path, base_dir: &str) -> PathBuf {
    let configured = Path::new(base_dir);
    if configured.is_absolute() {
        normalize(configured)
    } else {
        normalize(&project_root.join(configured))
    }
}

/// Fold `.` and `..` segments without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
