use crate::syntax::{Node, NodeKind};

/// How a string literal is passed to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallArgument<'t> {
    /// `callee("literal")`
    Direct(Node<'t>),
    /// `callee(["literal", ...])`
    InArray(Node<'t>),
}

impl<'t> CallArgument<'t> {
    pub fn literal(&self) -> Node<'t> {
        match self {
            Self::Direct(node) | Self::InArray(node) => *node,
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, Self::Direct(_))
    }
}

/// Classify `literal` as an argument of a call to the identifier `callee`.
pub fn match_call_argument<'t>(literal: Node<'t>, callee: &str) -> Option<CallArgument<'t>> {
    if !literal.is_string_literal() {
        return None;
    }

    let parent = literal.parent()?;
    match parent.kind() {
        NodeKind::Call { .. } => {
            (parent.callee_name() == Some(callee)).then_some(CallArgument::Direct(literal))
        }
        NodeKind::ArrayLiteral => {
            let outer = parent.parent()?;
            (outer.callee_name() == Some(callee)).then_some(CallArgument::InArray(literal))
        }
        _ => None,
    }
}

/// Whether `literal` is passed to `callee` and, when a cursor `offset` is
/// given, the cursor sits strictly between the literal's quotes.
pub fn is_literal_in_call(literal: Node<'_>, offset: Option<usize>, callee: &str) -> bool {
    if match_call_argument(literal, callee).is_none() {
        return false;
    }

    match offset {
        Some(offset) => literal.start() < offset && offset < literal.end(),
        None => true,
    }
}
