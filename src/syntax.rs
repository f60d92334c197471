//! Read-only syntax tree used by the analysis engine.
//!
//! Source text is parsed with swc and lowered into a flat arena of nodes. Only
//! the shape the engine needs survives: call expressions (with their callee
//! name when it is a plain identifier), array literals, string literals,
//! identifiers and spreads. Every other expression is kept as an opaque
//! `Other` node so that parent/child relations stay faithful to the source.
//!
//! Spans are half-open `[start, end)` and measured in characters.

use std::fmt;

use swc_common::{BytePos, FileName, SourceMap, Spanned, input::SourceFileInput, sync::Lrc};
use swc_ecma_ast::*;
use swc_ecma_parser::{EsSyntax, Parser, Syntax, TsSyntax, lexer::Lexer};
use swc_ecma_visit::{Visit, VisitWith};

use crate::error::{AnalysisError, Result};

/// Convert a Wtf8Atom (string literal value) to a Rust String
fn wtf8_to_string(atom: &swc_atoms::Wtf8Atom) -> String {
    atom.as_wtf8().as_str().unwrap_or_default().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    SourceFile,
    /// `callee` is set only when the callee is a plain identifier.
    Call { callee: Option<String> },
    ArrayLiteral,
    StringLiteral { text: String },
    Identifier { name: String },
    Spread,
    Other,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    start: usize,
    end: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

/// Borrowed view of one node in a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'t NodeKind {
        &self.data().kind
    }

    pub fn start(&self) -> usize {
        self.data().start
    }

    pub fn end(&self) -> usize {
        self.data().end
    }

    pub fn width(&self) -> usize {
        self.end() - self.start()
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start() <= offset && offset < self.end()
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.data().parent.map(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| tree.node(id))
    }

    /// Literal content of a string literal, without quotes.
    pub fn text(&self) -> Option<&'t str> {
        match self.kind() {
            NodeKind::StringLiteral { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_string_literal(&self) -> bool {
        matches!(self.kind(), NodeKind::StringLiteral { .. })
    }

    pub fn is_array_literal(&self) -> bool {
        matches!(self.kind(), NodeKind::ArrayLiteral)
    }

    /// Callee name when this node is a call to a plain identifier.
    pub fn callee_name(&self) -> Option<&'t str> {
        match self.kind() {
            NodeKind::Call {
                callee: Some(name),
            } => Some(name),
            _ => None,
        }
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id.0)
            .field("kind", self.kind())
            .field("start", &self.start())
            .field("end", &self.end())
            .finish()
    }
}

impl SyntaxTree {
    /// Parse `source` in the dialect named by `lang` (`tsx`, `typescript`,
    /// `jsx`; anything else is JavaScript with JSX).
    pub fn parse(source: &str, lang: &str) -> Result<Self> {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(
            Lrc::new(FileName::Custom("input".into())),
            source.to_string(),
        );

        let syntax = match lang {
            "tsx" => Syntax::Typescript(TsSyntax {
                tsx: true,
                ..Default::default()
            }),
            "typescript" => Syntax::Typescript(TsSyntax {
                tsx: false,
                ..Default::default()
            }),
            _ => Syntax::Es(EsSyntax {
                jsx: true,
                ..Default::default()
            }),
        };

        let lexer = Lexer::new(
            syntax,
            Default::default(),
            SourceFileInput::from(&*fm),
            None,
        );

        let mut parser = Parser::new_from(lexer);
        let module = parser
            .parse_module()
            .map_err(|e| AnalysisError::Parse(format!("{:?}", e.into_kind().msg())))?;

        let offsets = CharOffsets::new(source);
        let mut lowering = Lowering {
            nodes: Vec::new(),
            stack: Vec::new(),
            origin: fm.start_pos,
            offsets: &offsets,
        };
        lowering.open_range(NodeKind::SourceFile, 0, offsets.char_count());
        module.visit_with(&mut lowering);
        lowering.close();

        Ok(Self {
            nodes: lowering.nodes,
        })
    }

    pub fn root(&self) -> Node<'_> {
        self.node(NodeId(0))
    }

    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { tree: self, id }
    }

    /// Most specific node whose span contains `offset`.
    pub fn node_at_offset(&self, offset: usize) -> Option<Node<'_>> {
        let mut current = self.root();
        if !current.contains(offset) {
            return None;
        }

        'descend: loop {
            for child in current.children() {
                if child.contains(offset) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// All nodes matching `predicate`, in document order.
    ///
    /// A matching node is not descended into. Elements of an array literal are
    /// tested one by one and the walk never goes below them.
    pub fn find_all<P>(&self, predicate: P) -> Vec<Node<'_>>
    where
        P: Fn(Node<'_>) -> bool,
    {
        let mut found = Vec::new();
        let mut pending = vec![self.root()];

        while let Some(node) = pending.pop() {
            if node.is_array_literal() {
                found.extend(node.children().filter(|element| predicate(*element)));
            } else if predicate(node) {
                found.push(node);
            } else {
                pending.extend(node.children().rev());
            }
        }

        found
    }
}

/// Byte offset -> character offset lookup for one source text.
struct CharOffsets {
    starts: Vec<usize>,
}

impl CharOffsets {
    fn new(source: &str) -> Self {
        Self {
            starts: source.char_indices().map(|(i, _)| i).collect(),
        }
    }

    fn char_count(&self) -> usize {
        self.starts.len()
    }

    fn char_offset(&self, byte: usize) -> usize {
        self.starts.partition_point(|&start| start < byte)
    }
}

struct Lowering<'a> {
    nodes: Vec<NodeData>,
    stack: Vec<NodeId>,
    origin: BytePos,
    offsets: &'a CharOffsets,
}

impl Lowering<'_> {
    fn to_char(&self, pos: BytePos) -> usize {
        let byte = pos.0.saturating_sub(self.origin.0) as usize;
        self.offsets.char_offset(byte)
    }

    fn open(&mut self, kind: NodeKind, lo: BytePos, hi: BytePos) {
        let (start, end) = (self.to_char(lo), self.to_char(hi));
        self.open_range(kind, start, end);
    }

    fn open_range(&mut self, kind: NodeKind, start: usize, end: usize) {
        let id = NodeId(self.nodes.len());
        let parent = self.stack.last().copied();
        self.nodes.push(NodeData {
            kind,
            start,
            end,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        self.stack.push(id);
    }

    fn close(&mut self) {
        self.stack.pop();
    }
}

fn callee_name(callee: &Callee) -> Option<String> {
    match callee {
        Callee::Expr(expr) => ident_name(expr),
        _ => None,
    }
}

fn ident_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        _ => None,
    }
}

impl Visit for Lowering<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        let kind = match expr {
            Expr::Call(call) => NodeKind::Call {
                callee: callee_name(&call.callee),
            },
            // `t?.("key")`
            Expr::OptChain(chain) => match chain.base.as_ref() {
                OptChainBase::Call(call) => NodeKind::Call {
                    callee: ident_name(&call.callee),
                },
                OptChainBase::Member(_) => NodeKind::Other,
            },
            Expr::Array(_) => NodeKind::ArrayLiteral,
            Expr::Lit(Lit::Str(s)) => NodeKind::StringLiteral {
                text: wtf8_to_string(&s.value),
            },
            Expr::Ident(ident) => NodeKind::Identifier {
                name: ident.sym.to_string(),
            },
            _ => NodeKind::Other,
        };

        let span = expr.span();
        self.open(kind, span.lo, span.hi);
        expr.visit_children_with(self);
        self.close();
    }

    fn visit_expr_or_spread(&mut self, arg: &ExprOrSpread) {
        match arg.spread {
            Some(dots) => {
                self.open(NodeKind::Spread, dots.lo, arg.expr.span().hi);
                arg.visit_children_with(self);
                self.close();
            }
            None => arg.visit_children_with(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SyntaxTree {
        SyntaxTree::parse(source, "tsx").expect("source should parse")
    }

    #[test]
    fn string_literal_span_includes_quotes() {
        let source = r#"useTranslation("common");"#;
        let tree = parse(source);
        let literal = tree
            .node_at_offset(17)
            .expect("offset is inside the source");
        assert_eq!(literal.text(), Some("common"));
        assert_eq!(literal.start(), 15);
        assert_eq!(literal.end(), 23);
        assert_eq!(
            literal.parent().and_then(|p| p.callee_name()),
            Some("useTranslation")
        );
    }

    #[test]
    fn spans_are_measured_in_characters() {
        let source = "const s = \"héllo\"; t(\"x\");";
        let tree = parse(source);
        let literals = tree.find_all(|node| node.is_string_literal());
        assert_eq!(literals.len(), 2);
        assert_eq!(literals[1].start(), 21);
        assert_eq!(literals[1].end(), 24);
    }

    #[test]
    fn offset_outside_source_finds_nothing() {
        let tree = parse("t(\"a\");");
        assert!(tree.node_at_offset(100).is_none());
    }

    #[test]
    fn array_elements_are_tested_individually() {
        let tree = parse(r#"useTranslation(["a", "b", f("c")]);"#);
        let literals = tree.find_all(|node| node.is_string_literal());
        let texts: Vec<_> = literals.iter().filter_map(|n| n.text()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn matching_nodes_are_not_descended_into() {
        let tree = parse(r#"t("a", g("b"));"#);
        let calls = tree.find_all(|node| matches!(node.kind(), NodeKind::Call { .. }));
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].callee_name(), Some("t"));
    }

    #[test]
    fn wrapped_literals_are_not_direct_arguments() {
        let tree = parse(r#"t(("a")); t(..."b");"#);
        for literal in tree.find_all(|node| node.is_string_literal()) {
            let parent = literal.parent().expect("literal has a parent");
            assert!(parent.callee_name().is_none());
        }
    }

    #[test]
    fn template_literals_are_not_string_literals() {
        let tree = parse("t(`a`);");
        assert!(tree.find_all(|node| node.is_string_literal()).is_empty());
    }

    #[test]
    fn optional_calls_are_calls() {
        let tree = parse(r#"t?.("a"); i18n?.t("b");"#);
        let callees: Vec<_> = tree
            .find_all(|node| node.is_string_literal())
            .iter()
            .map(|literal| literal.parent().and_then(|p| p.callee_name()))
            .collect();
        assert_eq!(callees, vec![Some("t"), None]);
    }
}
