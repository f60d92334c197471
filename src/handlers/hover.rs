use serde::{Deserialize, Serialize};

use super::Answer;
use super::completion::STRING_KIND;
use crate::context::{AnalysisContext, Document};
use crate::util::quoted_list;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPart {
    pub text: String,
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickInfo {
    pub kind: String,
    pub kind_modifiers: String,
    pub text_span: TextSpan,
    pub display_parts: Vec<DisplayPart>,
}

/// Hover over a hook literal lists the declared namespaces.
pub fn quick_info_at_position<P, D>(
    context: &AnalysisContext,
    document: &Document,
    offset: usize,
    delegate: D,
) -> Answer<P, QuickInfo>
where
    D: FnOnce() -> Option<P>,
{
    let prior = Answer::Delegate(delegate());

    if !context.is_valid_project() {
        return prior;
    }

    let Some(tree) = context.parse(document) else {
        return prior;
    };

    if context.find_literal_in_hook_call(&tree, offset).is_none() {
        return prior;
    }

    let namespaces = context.namespaces();
    Answer::Engine(QuickInfo {
        kind: STRING_KIND.to_string(),
        kind_modifiers: String::new(),
        text_span: TextSpan {
            start: offset,
            length: 1,
        },
        display_parts: vec![DisplayPart {
            text: format!("(i18n namespace) {}", quoted_list(namespaces.as_slice())),
            kind: String::new(),
        }],
    })
}
