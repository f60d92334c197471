use serde::{Deserialize, Serialize};

use super::{Answer, distinct};
use crate::context::{AnalysisContext, Document};
use crate::error::Result;

pub const STRING_KIND: &str = "string";
pub const AMBIENT_MODIFIER: &str = "declare";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub name: String,
    pub kind: String,
    pub kind_modifiers: String,
    pub sort_text: String,
}

impl CompletionEntry {
    fn string(name: String) -> Self {
        Self {
            name,
            kind: STRING_KIND.to_string(),
            kind_modifiers: AMBIENT_MODIFIER.to_string(),
            sort_text: "0".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionInfo {
    pub is_global_completion: bool,
    pub is_member_completion: bool,
    pub is_new_identifier_location: bool,
    pub entries: Vec<CompletionEntry>,
}

impl CompletionInfo {
    pub fn from_names(names: impl IntoIterator<Item = String>) -> Self {
        Self {
            is_global_completion: false,
            is_member_completion: false,
            is_new_identifier_location: false,
            entries: names.into_iter().map(CompletionEntry::string).collect(),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Completions for namespace and key literals.
///
/// Inside a hook literal every declared namespace is offered. Inside a bound
/// function literal the keys of the namespaces used in the file are offered,
/// prefixed with `namespace:` when more than one namespace is in use.
/// Anything else is left to the delegate, whose result is returned as is.
pub fn completions_at_position<P, D>(
    context: &AnalysisContext,
    document: &Document,
    offset: usize,
    delegate: D,
) -> Result<Answer<P, CompletionInfo>>
where
    D: FnOnce() -> Option<P>,
{
    let prior = Answer::Delegate(delegate());

    if !context.is_valid_project() {
        return Ok(prior);
    }

    let Some(tree) = context.parse(document) else {
        return Ok(prior);
    };

    if context.find_literal_in_hook_call(&tree, offset).is_some() {
        return Ok(Answer::Engine(CompletionInfo::from_names(context.namespaces())));
    }

    if context.find_literal_in_bound_call(&tree, offset).is_none() {
        return Ok(prior);
    }

    let namespaces = distinct(
        context
            .find_all_literals_in_hook_calls(&tree)
            .into_iter()
            .filter_map(|node| node.text().map(str::to_string)),
    );

    let info = match namespaces.as_slice() {
        [] => return Ok(prior),
        [namespace] => CompletionInfo::from_names(context.symbols(namespace)?),
        _ => {
            let mut names = Vec::new();
            for namespace in &namespaces {
                for symbol in context.symbols(namespace)? {
                    names.push(format!("{}:{}", namespace, symbol));
                }
            }
            CompletionInfo::from_names(names)
        }
    };

    tracing::debug!(file = %document.file, entries = info.entries.len(), "key completions");
    Ok(Answer::Engine(info))
}
