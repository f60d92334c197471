//! Editor-facing handlers.
//!
//! Each handler receives the delegate (the result the editor's own language
//! service would produce) and either returns it untouched or answers with
//! i18n-specific data. The delegate's result is generic so that hosts can
//! pass it around as raw JSON and get every field back as sent.

use serde::Serialize;

pub mod completion;
pub mod diagnostics;
pub mod hover;

pub use completion::{CompletionEntry, CompletionInfo, completions_at_position};
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticKind, DiagnosticReport, semantic_diagnostics,
};
pub use hover::{DisplayPart, QuickInfo, TextSpan, quick_info_at_position};

/// Result of a handler that either defers to the delegate or replaces it.
///
/// Serializes as the inner value, so `Delegate(None)` is `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Answer<P, T> {
    Delegate(Option<P>),
    Engine(T),
}

impl<P, T> Answer<P, T> {
    pub fn is_delegate(&self) -> bool {
        matches!(self, Self::Delegate(_))
    }

    pub fn into_engine(self) -> Option<T> {
        match self {
            Self::Engine(answer) => Some(answer),
            Self::Delegate(_) => None,
        }
    }
}

/// Order-preserving dedup of hook namespace literals.
fn distinct(texts: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for text in texts {
        if !out.contains(&text) {
            out.push(text);
        }
    }
    out
}
