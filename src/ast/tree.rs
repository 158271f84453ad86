use std::{fmt::Display, rc::Rc};

use super::{ExprId, ExprKind, Literal, Span};

#[derive(Debug, Clone)]
struct Node {
    kind: ExprKind,
    parent: Option<ExprId>,
    first_child: Option<ExprId>,
    last_child: Option<ExprId>,
    prev_sibling: Option<ExprId>,
    next_sibling: Option<ExprId>,
}

impl Node {
    fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// Arena of expression nodes for one compilation unit.
///
/// Nodes are never freed individually. A node that is unlinked and not
/// re-attached stays allocated until the whole tree is dropped.
/// The tree keeps a copy of the source so that names, which are spans, can be
/// resolved.
#[derive(Debug, Clone)]
pub struct Tree {
    source: Rc<str>,
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(source: impl Into<Rc<str>>) -> Self {
        Self {
            source: source.into(),
            nodes: Vec::new(),
        }
    }

    /// Allocates a fresh, detached node without children.
    pub fn alloc(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::from_index(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    /// Number of nodes ever allocated.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the source text covered by `span`.
    pub fn text(&self, span: Span) -> &str {
        &self.source[span.start..span.end]
    }

    fn node(&self, id: ExprId) -> &Node {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: ExprId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: ExprId) -> ExprKind {
        self.node(id).kind
    }

    /// Returns the identifier of a `Var` or `Func` node.
    pub fn name(&self, id: ExprId) -> Option<&str> {
        self.kind(id).name().map(|span| self.text(span))
    }

    pub fn parent(&self, id: ExprId) -> Option<ExprId> {
        self.node(id).parent
    }

    pub fn is_attached(&self, id: ExprId) -> bool {
        self.node(id).parent.is_some()
    }

    pub fn first_child(&self, id: ExprId) -> Option<ExprId> {
        self.node(id).first_child
    }

    pub fn last_child(&self, id: ExprId) -> Option<ExprId> {
        self.node(id).last_child
    }

    pub fn next_sibling(&self, id: ExprId) -> Option<ExprId> {
        self.node(id).next_sibling
    }

    pub fn prev_sibling(&self, id: ExprId) -> Option<ExprId> {
        self.node(id).prev_sibling
    }

    pub fn children(&self, id: ExprId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    pub fn child_count(&self, id: ExprId) -> usize {
        self.children(id).count()
    }

    /// Makes `child` the last child of `parent`.
    ///
    /// Panics if `child` is attached to a parent.
    pub fn append_child(&mut self, parent: ExprId, child: ExprId) {
        assert!(
            !self.is_attached(child),
            "cannot append {:?}: node is already attached",
            child
        );
        assert_ne!(parent, child, "cannot make a node its own child");
        let tail = self.node(parent).last_child;
        {
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.prev_sibling = tail;
            node.next_sibling = None;
        }
        match tail {
            Some(tail) => self.node_mut(tail).next_sibling = Some(child),
            None => self.node_mut(parent).first_child = Some(child),
        }
        self.node_mut(parent).last_child = Some(child);
    }

    /// Makes `child` the next sibling of `after`.
    ///
    /// Panics if `after` is detached or `child` is attached.
    pub fn insert_child(&mut self, after: ExprId, child: ExprId) {
        let parent = match self.parent(after) {
            Some(p) => p,
            None => panic!("cannot insert after {:?}: anchor is detached", after),
        };
        assert!(
            !self.is_attached(child),
            "cannot insert {:?}: node is already attached",
            child
        );
        let next = self.node(after).next_sibling;
        {
            let node = self.node_mut(child);
            node.parent = Some(parent);
            node.prev_sibling = Some(after);
            node.next_sibling = next;
        }
        self.node_mut(after).next_sibling = Some(child);
        match next {
            Some(next) => self.node_mut(next).prev_sibling = Some(child),
            None => self.node_mut(parent).last_child = Some(child),
        }
    }

    /// Removes `node` from its parent's child list.
    ///
    /// Panics if `node` is detached.
    pub fn unparent(&mut self, node: ExprId) {
        let parent = match self.parent(node) {
            Some(p) => p,
            None => panic!("cannot unparent {:?}: node is detached", node),
        };
        let (prev, next) = {
            let n = self.node(node);
            (n.prev_sibling, n.next_sibling)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }
        let n = self.node_mut(node);
        n.parent = None;
        n.prev_sibling = None;
        n.next_sibling = None;
    }

    /// Puts the detached node `new` at the position of `old` and detaches `old`.
    /// If `old` is detached, only checks that `new` is detached as well.
    pub fn replace(&mut self, old: ExprId, new: ExprId) {
        if old == new {
            return;
        }
        if self.is_attached(old) {
            self.insert_child(old, new);
            self.unparent(old);
        } else {
            assert!(
                !self.is_attached(new),
                "cannot replace with {:?}: node is already attached",
                new
            );
        }
    }

    /// Returns the node following `current` in a pre-order traversal of `root`.
    /// Returns `None` once the subtree of `root` is exhausted.
    pub fn preorder_next(&self, root: ExprId, current: ExprId) -> Option<ExprId> {
        if let Some(child) = self.first_child(current) {
            return Some(child);
        }
        let mut node = current;
        while node != root {
            if let Some(sibling) = self.next_sibling(node) {
                return Some(sibling);
            }
            node = self.parent(node)?;
        }
        None
    }

    /// Iterates the subtree of `root` in pre-order.
    pub fn preorder(&self, root: ExprId) -> Preorder<'_> {
        Preorder {
            tree: self,
            root,
            next: Some(root),
        }
    }

    /// Deep-copies the subtree of `id` into fresh nodes and returns the detached copy.
    pub fn duplicate(&mut self, id: ExprId) -> ExprId {
        let copy = self.alloc(self.kind(id));
        let mut child = self.first_child(id);
        while let Some(c) = child {
            let c_copy = self.duplicate(c);
            self.append_child(copy, c_copy);
            child = self.next_sibling(c);
        }
        copy
    }

    /// Renders the subtree of `id` as `Kind[name]{ child child }`.
    pub fn display(&self, id: ExprId) -> DisplayExpr<'_> {
        DisplayExpr { tree: self, id }
    }
}

/// Iterator over the children of a node, in order.
pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<ExprId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = ExprId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree, see [`Tree::preorder_next`].
pub struct Preorder<'a> {
    tree: &'a Tree,
    root: ExprId,
    next: Option<ExprId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = ExprId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.preorder_next(self.root, current);
        Some(current)
    }
}

/* Pretty */

pub struct DisplayExpr<'a> {
    tree: &'a Tree,
    id: ExprId,
}

impl Display for DisplayExpr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = self.tree.kind(self.id);
        write!(f, "{}", kind)?;
        if let Some(name) = kind.name() {
            if !name.is_empty() {
                write!(f, "[{}]", self.tree.text(name))?;
            }
        }
        if self.tree.first_child(self.id).is_some() {
            write!(f, "{{ ")?;
            for child in self.tree.children(self.id) {
                write!(f, "{} ", self.tree.display(child))?;
            }
            write!(f, "}}")?;
        }
        Ok(())
    }
}

impl Literal {
    /// Renders the constant value, resolving string spans against `tree`.
    pub fn to_source(&self, tree: &Tree) -> String {
        match self {
            Literal::Int(i) => i.to_string(),
            Literal::Float(x) => format!("{:?}", x),
            Literal::Str(span) => format!("\"{}\"", tree.text(*span)),
        }
    }
}
