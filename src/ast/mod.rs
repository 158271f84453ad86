//! Abstract syntax tree of planning-domain preconditions.
//!
//! Expressions live in a [`Tree`], an arena of nodes addressed by [`ExprId`].
//! Nodes are linked intrusively (first child, next sibling) and are only ever
//! restructured through the primitives of [`Tree`].

use std::fmt::Display;

mod tree;
mod world;

pub use tree::{Children, DisplayExpr, Tree};
pub use world::{DataType, Fact, World};

/// A byte range into the compiled source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// Handle of a node in a [`Tree`].
/// Handles are only meaningful for the tree that allocated them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn from_index(index: usize) -> Self {
        ExprId(u32::try_from(index).expect("expression arena exhausted"))
    }
}

/// Constant payload of a [`ExprKind::Literal`] node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    /// String constant, the span covers the text between the quotes.
    Str(Span),
}

/// The kind of an expression node, together with its payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExprKind {
    /* Logical */
    /// N-ary conjunction, the empty conjunction is `true`
    And,
    /// N-ary disjunction
    Or,
    /// Negation, has exactly one child
    Not,

    /* Relational */
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    /* Arithmetic */
    Plus,
    Minus,
    Multiply,
    Divide,

    /* Leaves */
    /// Variable, named by an identifier
    Var(Span),
    /// Function call or fact reference, arguments are the children
    Func(Span),
    /// Numeric or string constant
    Literal(Literal),
}

impl ExprKind {
    /// Returns true for `And`, `Or` and `Not`.
    pub fn is_logical(&self) -> bool {
        matches!(self, ExprKind::And | ExprKind::Or | ExprKind::Not)
    }

    /// Returns true for the n-ary connectives that can absorb children of their own kind.
    pub fn is_associative(&self) -> bool {
        matches!(self, ExprKind::And | ExprKind::Or)
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            ExprKind::Equal
                | ExprKind::NotEqual
                | ExprKind::Less
                | ExprKind::LessEqual
                | ExprKind::Greater
                | ExprKind::GreaterEqual
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            ExprKind::Plus | ExprKind::Minus | ExprKind::Multiply | ExprKind::Divide
        )
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            ExprKind::Var(_) | ExprKind::Func(_) | ExprKind::Literal(_)
        )
    }

    /// Returns the connective obtained by De Morgan's laws, if any.
    pub fn dual(&self) -> Option<ExprKind> {
        match self {
            ExprKind::And => Some(ExprKind::Or),
            ExprKind::Or => Some(ExprKind::And),
            _ => None,
        }
    }

    /// Returns the identifier span of `Var` and `Func` nodes.
    pub fn name(&self) -> Option<Span> {
        match self {
            ExprKind::Var(name) | ExprKind::Func(name) => Some(*name),
            _ => None,
        }
    }

    /// The name of the kind as it appears in AST dumps.
    pub fn type_name(&self) -> &'static str {
        match self {
            ExprKind::And => "And",
            ExprKind::Or => "Or",
            ExprKind::Not => "Not",
            ExprKind::Equal => "Equal",
            ExprKind::NotEqual => "NotEqual",
            ExprKind::Less => "Less",
            ExprKind::LessEqual => "LessEqual",
            ExprKind::Greater => "Greater",
            ExprKind::GreaterEqual => "GreaterEqual",
            ExprKind::Plus => "Plus",
            ExprKind::Minus => "Minus",
            ExprKind::Multiply => "Multiply",
            ExprKind::Divide => "Divide",
            ExprKind::Var(_) => "Var",
            ExprKind::Func(_) => "Func",
            ExprKind::Literal(_) => "Literal",
        }
    }
}

impl Display for ExprKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// A parsed compilation unit: the world declaration and all preconditions.
/// All expressions are allocated in [`Ast::tree`].
#[derive(Debug, Clone)]
pub struct Ast {
    pub tree: Tree,
    pub world: World,
    pub preconds: Vec<ExprId>,
}
