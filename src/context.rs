use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::invocation::{is_literal_in_call, match_call_argument};
use crate::resource::{ResourceIndex, ResourceLocator};
use crate::syntax::{Node, SyntaxTree};

/// A source document as handed over by the editor.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file: String,
    pub source: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_lang() -> String {
    "tsx".to_string()
}

impl Document {
    pub fn new(file: impl Into<String>, source: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
            lang: lang.into(),
        }
    }
}

/// Project-wide view combining syntax lookups with resource resolution.
///
/// Built once per project; holds no mutable state, so requests may overlap.
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    config: AnalysisConfig,
    locator: ResourceLocator,
}

impl AnalysisContext {
    pub fn new(project_root: &Path, config: AnalysisConfig) -> Self {
        let locator = ResourceLocator::new(project_root, &config);
        tracing::info!(
            base_dir = %locator.base_dir().display(),
            valid = locator.is_valid(),
            "analysis context created"
        );
        Self { config, locator }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn base_dir(&self) -> &Path {
        self.locator.base_dir()
    }

    pub fn is_valid_project(&self) -> bool {
        self.locator.is_valid()
    }

    /// Parse the document. A source that cannot be parsed has no tree.
    pub fn parse(&self, document: &Document) -> Option<SyntaxTree> {
        match SyntaxTree::parse(&document.source, &document.lang) {
            Ok(tree) => Some(tree),
            Err(e) => {
                tracing::debug!(file = %document.file, error = %e, "source not analyzable");
                None
            }
        }
    }

    /// `useTranslation("|")` or `useTranslation(["|"])`
    pub fn find_literal_in_hook_call<'t>(
        &self,
        tree: &'t SyntaxTree,
        offset: usize,
    ) -> Option<Node<'t>> {
        self.literal_at(tree, offset, &self.config.call_expression_id)
    }

    /// `t("|")` with `t` bound from a hook call.
    pub fn find_literal_in_bound_call<'t>(
        &self,
        tree: &'t SyntaxTree,
        offset: usize,
    ) -> Option<Node<'t>> {
        self.literal_at(tree, offset, &self.config.binding_element_id)
    }

    fn literal_at<'t>(&self, tree: &'t SyntaxTree, offset: usize, callee: &str) -> Option<Node<'t>> {
        let node = tree.node_at_offset(offset)?;
        is_literal_in_call(node, Some(offset), callee).then_some(node)
    }

    /// Every string literal passed to the hook, directly or inside an array.
    pub fn find_all_literals_in_hook_calls<'t>(&self, tree: &'t SyntaxTree) -> Vec<Node<'t>> {
        tree.find_all(|node| node.is_string_literal())
            .into_iter()
            .filter(|node| is_literal_in_call(*node, None, &self.config.call_expression_id))
            .collect()
    }

    /// Every string literal passed directly to the bound function.
    pub fn find_all_literals_in_bound_calls<'t>(&self, tree: &'t SyntaxTree) -> Vec<Node<'t>> {
        tree.find_all(|node| node.is_string_literal())
            .into_iter()
            .filter(|node| {
                match_call_argument(*node, &self.config.binding_element_id)
                    .is_some_and(|arg| arg.is_direct())
            })
            .collect()
    }

    pub fn namespaces(&self) -> Vec<String> {
        self.locator.namespaces()
    }

    pub fn namespace_path(&self, namespace: &str) -> Result<PathBuf> {
        self.locator.namespace_path(namespace)
    }

    /// Symbols of a namespace that must exist; a missing file is fatal.
    pub fn symbols(&self, namespace: &str) -> Result<Vec<String>> {
        let path = self.locator.namespace_file(namespace)?;
        match ResourceIndex::load(&path) {
            Some(index) => Ok(index.into_symbols()),
            None => {
                tracing::warn!(namespace, path = %path.display(), "resource file unavailable");
                Err(AnalysisError::ResourceUnavailable {
                    namespace: namespace.to_string(),
                    path,
                })
            }
        }
    }
}
