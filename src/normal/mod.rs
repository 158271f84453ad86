//! Rewrites precondition expressions into canonical forms.
//!
//! All passes work in place on a [`Tree`](crate::ast::Tree), relinking nodes
//! through the tree primitives and allocating fresh nodes where a shell of a
//! different kind is needed. None of the passes can fail: partial trees left
//! behind by syntax errors are rewritten as far as their shape allows.

mod dnf;
mod flatten;
mod nnf;

pub use dnf::convert_to_dnf;
pub use flatten::flatten;
pub use nnf::convert_to_nnf;

use crate::ast::{ExprId, ExprKind, Tree};

/// Returns true if `id` is a literal: anything but `And`, `Or` and `Not`,
/// or a `Not` whose operand is such a node.
pub fn is_literal(tree: &Tree, id: ExprId) -> bool {
    let kind = tree.kind(id);
    if !kind.is_logical() {
        return true;
    }
    if kind == ExprKind::Not {
        return match tree.first_child(id) {
            Some(operand) => !tree.kind(operand).is_logical(),
            None => true,
        };
    }
    false
}

/// Returns true if the subtree of `root` is in negation normal form,
/// i.e. no `Not` has an `And`, `Or` or `Not` operand.
pub fn is_nnf(tree: &Tree, root: ExprId) -> bool {
    tree.preorder(root)
        .filter(|id| tree.kind(*id) == ExprKind::Not)
        .all(|id| is_literal(tree, id))
}

/// Returns true if no `And`/`Or` node of the subtree of `root` has a child of its own kind.
pub fn is_flat(tree: &Tree, root: ExprId) -> bool {
    tree.preorder(root).all(|id| {
        let kind = tree.kind(id);
        !kind.is_associative() || tree.children(id).all(|c| tree.kind(c) != kind)
    })
}

/// Returns true if `root` is a disjunction of conjunctions of literals.
pub fn is_dnf(tree: &Tree, root: ExprId) -> bool {
    tree.kind(root) == ExprKind::Or
        && tree.children(root).all(|clause| {
            tree.kind(clause) == ExprKind::And
                && tree.children(clause).all(|lit| is_literal(tree, lit))
        })
}

#[cfg(test)]
mod tests;
