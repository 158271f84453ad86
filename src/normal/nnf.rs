use smallvec::SmallVec;

use super::flatten;
use crate::ast::{ExprId, ExprKind, Tree};

/// Converts the expression `root` to *Negation Normal Form* (NNF) and returns the new root.
///
/// Negations are pushed towards the leaves using De Morgan's laws and double
/// negations are removed. Relational and arithmetic nodes, variables,
/// function calls and constants are treated as literals: a negation above
/// them stays where it is. Their operands are converted on their own.
/// The result is flattened.
///
/// If `root` is attached to a parent, the converted expression takes its place.
pub fn convert_to_nnf(tree: &mut Tree, root: ExprId) -> ExprId {
    let result = to_nnf(tree, root);
    tree.replace(root, result);
    flatten(tree, result);
    log::trace!("NNF: {}", tree.display(result));
    result
}

/// Converts a node and returns the node that replaces it.
/// If the returned node differs from `node`, it is detached and `node` must be replaced by it.
fn to_nnf(tree: &mut Tree, node: ExprId) -> ExprId {
    match tree.kind(node) {
        ExprKind::And | ExprKind::Or => {
            convert_children(tree, node);
            node
        }
        ExprKind::Not => {
            let operand = match tree.first_child(node) {
                Some(operand) => operand,
                // Partial node left by a syntax error
                None => return node,
            };
            match tree.kind(operand) {
                ExprKind::Not => match tree.first_child(operand) {
                    Some(inner) => {
                        // Double negation: ¬¬a is equivalent to a
                        tree.unparent(inner);
                        to_nnf(tree, inner)
                    }
                    None => node,
                },
                ExprKind::And | ExprKind::Or => {
                    // De Morgan's laws: ¬(a ∧ b) is equivalent to ¬a ∨ ¬b, and vice versa
                    let dual = match tree.kind(operand).dual() {
                        Some(dual) => dual,
                        None => unreachable!(), // This match arm handles only Or and And
                    };
                    let shell = tree.alloc(dual);
                    let operands: SmallVec<[ExprId; 8]> = tree.children(operand).collect();
                    for op in operands {
                        tree.unparent(op);
                        let negated = tree.alloc(ExprKind::Not);
                        tree.append_child(negated, op);
                        let converted = to_nnf(tree, negated);
                        tree.append_child(shell, converted);
                    }
                    shell
                }
                // Must be a literal, keep the negation above it
                _ => {
                    convert_children(tree, operand);
                    node
                }
            }
        }
        // Non-logical nodes are literals
        _ => {
            convert_children(tree, node);
            node
        }
    }
}

/// Converts every child of `node` in place, keeping their order.
fn convert_children(tree: &mut Tree, node: ExprId) {
    let children: SmallVec<[ExprId; 8]> = tree.children(node).collect();
    for child in children {
        let converted = to_nnf(tree, child);
        tree.replace(child, converted);
    }
}
