use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

use crate::context::{AnalysisContext, Document};
use crate::error::Result;
use crate::syntax::Node;
use crate::util::{or_quoted_empty, quoted_list};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

/// A diagnostic reported by the engine, in the editor's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: i64,
    pub message_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
}

/// Delegate diagnostics followed by the engine's own.
///
/// Serializes as one flat array with the delegate entries first and untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticReport<P> {
    pub prior: Vec<P>,
    pub found: Vec<Diagnostic>,
}

impl<P> DiagnosticReport<P> {
    fn passthrough(prior: Vec<P>) -> Self {
        Self {
            prior,
            found: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.prior.len() + self.found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<P: Serialize> Serialize for DiagnosticReport<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for diagnostic in &self.prior {
            seq.serialize_element(diagnostic)?;
        }
        for diagnostic in &self.found {
            seq.serialize_element(diagnostic)?;
        }
        seq.end()
    }
}

/// The i18n problems the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Hook argument that is not a declared namespace.
    InvalidNamespace,
    /// Bound function called while no hook namespace is in scope.
    MissingNamespaceContext,
    InvalidKey,
    /// `namespace:key` expected but no namespace segment given.
    ExpectedNamespace,
    /// Namespace segment of `namespace:key` not among the used namespaces.
    InvalidNamespaceSegment,
}

impl DiagnosticKind {
    pub fn code(self) -> i64 {
        match self {
            Self::InvalidNamespace => 9001,
            Self::MissingNamespaceContext => 9002,
            Self::InvalidKey => 9003,
            Self::ExpectedNamespace => 9004,
            Self::InvalidNamespaceSegment => 9005,
        }
    }

    fn error(self, message_text: String, file: &str, start: usize, length: usize) -> Diagnostic {
        Diagnostic {
            category: DiagnosticCategory::Error,
            code: self.code(),
            message_text,
            file: Some(file.to_string()),
            start: Some(start),
            length: Some(length),
        }
    }
}

/// Delegate diagnostics followed by invalid namespace and key errors.
///
/// Every hook literal must name a declared namespace. Every bound function
/// literal must name a key of the single used namespace, or a
/// `namespace:key` pair when several namespaces are used. Each literal yields
/// at most one diagnostic.
pub fn semantic_diagnostics<P, D>(
    context: &AnalysisContext,
    document: &Document,
    delegate: D,
) -> Result<DiagnosticReport<P>>
where
    D: FnOnce() -> Vec<P>,
{
    let prior = delegate();

    if !context.is_valid_project() {
        return Ok(DiagnosticReport::passthrough(prior));
    }

    let Some(tree) = context.parse(document) else {
        return Ok(DiagnosticReport::passthrough(prior));
    };

    let mut diagnostics = Vec::new();
    let file = document.file.as_str();
    let declared = context.namespaces();
    let hook_literals = context.find_all_literals_in_hook_calls(&tree);
    let bound_literals = context.find_all_literals_in_bound_calls(&tree);

    let used: Vec<String> = hook_literals
        .iter()
        .filter_map(|node| node.text())
        .filter(|text| declared.iter().any(|ns| ns == text))
        .map(str::to_string)
        .collect();

    for node in &hook_literals {
        let text = node.text().unwrap_or_default();
        if !declared.iter().any(|ns| ns == text) {
            diagnostics.push(DiagnosticKind::InvalidNamespace.error(
                format!(
                    "Invalid namespace {}, expected one of: {}",
                    or_quoted_empty(text),
                    quoted_list(declared.as_slice())
                ),
                file,
                node.start(),
                node.width(),
            ));
        }
    }

    let mut checker = KeyChecker {
        context,
        file,
        used: &used,
        symbols: HashMap::new(),
    };
    for node in bound_literals {
        if let Some(diagnostic) = checker.check(node)? {
            diagnostics.push(diagnostic);
        }
    }

    tracing::debug!(file, added = diagnostics.len(), "i18n diagnostics");
    Ok(DiagnosticReport {
        prior,
        found: diagnostics,
    })
}

struct KeyChecker<'a> {
    context: &'a AnalysisContext,
    file: &'a str,
    used: &'a [String],
    /// Symbols already loaded during this request.
    symbols: HashMap<String, Vec<String>>,
}

impl KeyChecker<'_> {
    fn symbols(&mut self, namespace: &str) -> Result<&[String]> {
        if !self.symbols.contains_key(namespace) {
            let loaded = self.context.symbols(namespace)?;
            self.symbols.insert(namespace.to_string(), loaded);
        }
        Ok(self.symbols.get(namespace).map(Vec::as_slice).unwrap_or_default())
    }

    fn check(&mut self, node: Node<'_>) -> Result<Option<Diagnostic>> {
        let text = node.text().unwrap_or_default();
        let (start, length) = (node.start(), node.width());
        let (file, used) = (self.file, self.used);

        match used {
            [] => Ok(Some(DiagnosticKind::MissingNamespaceContext.error(
                "Cannot invoke function without set namespace(s)".to_string(),
                file,
                start,
                length,
            ))),
            [namespace] => {
                let keys = self.symbols(namespace)?;
                if keys.iter().any(|k| k == text) {
                    return Ok(None);
                }
                let message = format!(
                    "Invalid key {}, expected one of: {}",
                    or_quoted_empty(text),
                    quoted_list(keys)
                );
                Ok(Some(DiagnosticKind::InvalidKey.error(
                    message, file, start, length,
                )))
            }
            used => {
                let mut segments = text.split(':').filter(|s| !s.is_empty());
                let (Some(namespace), key) = (segments.next(), segments.next()) else {
                    return Ok(Some(DiagnosticKind::ExpectedNamespace.error(
                        format!(
                            "Expected namespace, namespace must be one of: {}",
                            quoted_list(used)
                        ),
                        file,
                        start,
                        length,
                    )));
                };

                let namespace_len = namespace.chars().count();
                if !used.iter().any(|ns| ns == namespace) {
                    return Ok(Some(DiagnosticKind::InvalidNamespaceSegment.error(
                        format!(
                            "Invalid namespace {}, expected one of: {}",
                            namespace,
                            quoted_list(used)
                        ),
                        file,
                        start + 1,
                        namespace_len,
                    )));
                }

                let keys = self.symbols(namespace)?;
                if key.is_some_and(|key| keys.iter().any(|k| k == key)) {
                    return Ok(None);
                }
                let message = format!(
                    "Invalid key {}, expected one of: {}",
                    or_quoted_empty(key.unwrap_or_default()),
                    quoted_list(keys)
                );
                let key_length = key.map_or(length, |key| key.chars().count());
                Ok(Some(DiagnosticKind::InvalidKey.error(
                    message,
                    file,
                    start + 1 + namespace_len + 1,
                    key_length,
                )))
            }
        }
    }
}
