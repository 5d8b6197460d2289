//! The Ruby Mini-Parser's AST: a tagged node carrying just the forms the
//! routing DSL and controller bodies need.

use std::sync::Arc;

/// A node in the mini-AST, tagged with the file and line it came from for
/// provenance in diagnostics and resolved-endpoint `source` fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub file: Arc<str>,
    pub line: u32,
}

impl Node {
    pub fn new(kind: NodeKind, file: Arc<str>, line: u32) -> Self {
        Self { kind, file, line }
    }
}

/// A keyword argument: `name: value`.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordArg {
    pub name: String,
    pub value: Node,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// `receiver.method(positional, kw: value) { block }` — `receiver` is
    /// `None` for a bare top-level call like `resources :posts`.
    Call {
        receiver: Option<Box<Node>>,
        method: String,
        positional_args: Vec<Node>,
        keyword_args: Vec<KeywordArg>,
        block: Option<Box<Node>>,
    },
    /// `do |params| body end` or `{ |params| body }`.
    Block {
        params: Vec<String>,
        body: Vec<Node>,
    },
    Symbol(String),
    StringLit(String),
    IntLit(i64),
    Ident(String),
    ArrayLit(Vec<Node>),
    HashLit(Vec<(Node, Node)>),
    ClassDef {
        name: String,
        parent: Option<String>,
        body: Vec<Node>,
    },
    ModuleDef {
        name: String,
        body: Vec<Node>,
    },
    MethodDef {
        name: String,
        body: Vec<Node>,
    },
    IfExpr {
        cond: Box<Node>,
        then_branch: Vec<Node>,
        else_branch: Option<Vec<Node>>,
    },
    Assign {
        target: String,
        value: Box<Node>,
    },
    /// A line or block the parser could not interpret. Legal, not fatal —
    /// surfaces as a `ParseTolerable` diagnostic one layer up.
    Unknown(String),
}

impl NodeKind {
    /// `true` literal condition, the only statically-true shape the
    /// evaluator recognizes (per the routing DSL's `if` handling).
    pub fn is_statically_true(&self) -> bool {
        matches!(self, NodeKind::Ident(name) if name == "true")
    }
}
