use smallvec::SmallVec;

use super::{convert_to_nnf, flatten};
use crate::ast::{ExprId, ExprKind, Tree};

/// A conjunction of literals under construction.
type Clause = SmallVec<[ExprId; 8]>;

/// Converts the expression `root` to *Disjunctive Normal Form* (DNF) and returns the new root.
///
/// The result is an `Or` whose children are all `And` nodes of literals (see
/// [`is_literal`](super::is_literal)). Conjunctions of disjunctions are expanded
/// with the distributive law. For `k` conjoined sub-expressions with
/// `n_1, ..., n_k` clauses the result has `n_1 * ... * n_k` clauses, no clause
/// is simplified or removed. Clauses are enumerated with the first operand
/// varying slowest and keep the literal order of the input.
///
/// The empty conjunction `And` converts to the empty disjunction `Or`.
/// If `root` is attached to a parent, the converted expression takes its place.
pub fn convert_to_dnf(tree: &mut Tree, root: ExprId) -> ExprId {
    let nnf = convert_to_nnf(tree, root);
    let slot = if tree.is_attached(nnf) {
        let slot = tree.alloc(ExprKind::Or);
        tree.insert_child(nnf, slot);
        tree.unparent(nnf);
        Some(slot)
    } else {
        None
    };
    let result = if tree.kind(nnf) == ExprKind::And && tree.first_child(nnf).is_none() {
        tree.alloc(ExprKind::Or)
    } else {
        to_dnf(tree, nnf)
    };
    if let Some(slot) = slot {
        tree.replace(slot, result);
    }
    flatten(tree, result);
    log::debug!("DNF with {} clause(s)", tree.child_count(result));
    log::trace!("DNF: {}", tree.display(result));
    result
}

/// Converts a detached node in NNF into a detached `Or` of `And` clauses.
/// The node itself is consumed: its literals are moved into the clauses.
fn to_dnf(tree: &mut Tree, node: ExprId) -> ExprId {
    match tree.kind(node) {
        ExprKind::Or => {
            let disjunction = tree.alloc(ExprKind::Or);
            for child in detach_children(tree, node) {
                let converted = to_dnf(tree, child);
                while let Some(clause) = tree.first_child(converted) {
                    tree.unparent(clause);
                    tree.append_child(disjunction, clause);
                }
            }
            disjunction
        }
        ExprKind::And => {
            let mut product: Vec<Clause> = vec![Clause::new()];
            for child in detach_children(tree, node) {
                let converted = to_dnf(tree, child);
                let clauses = take_clauses(tree, converted);
                product = distribute(&product, &clauses);
            }
            build_disjunction(tree, product)
        }
        // Literals, including negated literals
        _ => {
            let clause = tree.alloc(ExprKind::And);
            tree.append_child(clause, node);
            let disjunction = tree.alloc(ExprKind::Or);
            tree.append_child(disjunction, clause);
            disjunction
        }
    }
}

fn detach_children(tree: &mut Tree, node: ExprId) -> SmallVec<[ExprId; 8]> {
    let children: SmallVec<[ExprId; 8]> = tree.children(node).collect();
    for child in &children {
        tree.unparent(*child);
    }
    children
}

/// Takes the clauses of a converted `Or` apart into detached literals.
fn take_clauses(tree: &mut Tree, disjunction: ExprId) -> Vec<Clause> {
    let clauses: SmallVec<[ExprId; 8]> = tree.children(disjunction).collect();
    clauses
        .into_iter()
        .map(|clause| detach_children(tree, clause))
        .collect()
}

/// Conjoins every accumulated clause with every clause of the next operand.
/// Accumulated clauses vary slowest.
fn distribute(product: &[Clause], clauses: &[Clause]) -> Vec<Clause> {
    let mut next = Vec::with_capacity(product.len() * clauses.len());
    for acc in product {
        for clause in clauses {
            let mut combined = acc.clone();
            combined.extend_from_slice(clause);
            next.push(combined);
        }
    }
    next
}

/// Materializes clauses of literals as `Or{ And{ ... } ... }`.
/// A literal used by more than one clause is duplicated, because a node can only have one parent.
fn build_disjunction(tree: &mut Tree, product: Vec<Clause>) -> ExprId {
    let disjunction = tree.alloc(ExprKind::Or);
    for literals in product {
        let clause = tree.alloc(ExprKind::And);
        for literal in literals {
            let literal = if tree.is_attached(literal) {
                tree.duplicate(literal)
            } else {
                literal
            };
            tree.append_child(clause, literal);
        }
        tree.append_child(disjunction, clause);
    }
    disjunction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{normal::is_dnf, options::Options, parse::Parser};

    fn dnf(input: &str) -> String {
        let mut parser = Parser::new(input, Options::default());
        let expr = parser.parse_precond();
        let tree = parser.tree_mut();
        let expr = convert_to_dnf(tree, expr);
        assert!(is_dnf(tree, expr), "not in DNF: {}", tree.display(expr));
        tree.display(expr).to_string()
    }

    fn check_dnf_expr(input: &str, expected: &str) {
        assert_eq!(dnf(input), expected, "input: {}", input);
    }

    #[test]
    fn trivial_conversions() {
        check_dnf_expr("( )", "Or");
        check_dnf_expr("( x )", "Or{ And{ Var[x] } }");
        check_dnf_expr("( ~x )", "Or{ And{ Not{ Var[x] } } }");
        check_dnf_expr("( a | b )", "Or{ And{ Var[a] } And{ Var[b] } }");
        check_dnf_expr("( a & b )", "Or{ And{ Var[a] Var[b] } }");
    }

    #[test]
    fn empty_disjunction() {
        let mut tree = Tree::new("");
        let or = tree.alloc(ExprKind::Or);
        let result = convert_to_dnf(&mut tree, or);
        assert_eq!(tree.display(result).to_string(), "Or");
    }

    #[test]
    fn expression_is_converted_to_nnf() {
        check_dnf_expr(
            "( a & ~(b | c) )",
            "Or{ And{ Var[a] Not{ Var[b] } Not{ Var[c] } } }",
        );
    }

    #[test]
    fn distributive_law() {
        check_dnf_expr(
            "( t1 & (~t2 | (t2 & t3 & t4)) )",
            "Or{ And{ Var[t1] Not{ Var[t2] } } And{ Var[t1] Var[t2] Var[t3] Var[t4] } }",
        );
        check_dnf_expr(
            "( q1 & (r1 | r2) & q2 & (r3 | r4) & q3 )",
            "Or{ And{ Var[q1] Var[r1] Var[q2] Var[r3] Var[q3] } \
             And{ Var[q1] Var[r1] Var[q2] Var[r4] Var[q3] } \
             And{ Var[q1] Var[r2] Var[q2] Var[r3] Var[q3] } \
             And{ Var[q1] Var[r2] Var[q2] Var[r4] Var[q3] } }",
        );
    }

    #[test]
    fn non_logical_ops_are_trivial_conjuncts() {
        check_dnf_expr(
            "( (a | 7.0) & ((c <= d) | (c + d)) )",
            "Or{ And{ Var[a] LessEqual{ Var[c] Var[d] } } \
             And{ Var[a] Plus{ Var[c] Var[d] } } \
             And{ Literal LessEqual{ Var[c] Var[d] } } \
             And{ Literal Plus{ Var[c] Var[d] } } }",
        );
    }

    #[test]
    fn nested_disjunctions_are_concatenated() {
        check_dnf_expr(
            "( (a & b) | (c | (d & (e | f))) )",
            "Or{ And{ Var[a] Var[b] } And{ Var[c] } And{ Var[d] Var[e] } And{ Var[d] Var[f] } }",
        );
    }

    #[test]
    fn conjunction_with_empty_disjunction_has_no_clauses() {
        let mut tree = Tree::new("x");
        let and = tree.alloc(ExprKind::And);
        let x = tree.alloc(ExprKind::Var(crate::ast::Span::new(0, 1)));
        let or = tree.alloc(ExprKind::Or);
        tree.append_child(and, x);
        tree.append_child(and, or);
        let result = convert_to_dnf(&mut tree, and);
        assert_eq!(tree.display(result).to_string(), "Or");
    }

    #[test]
    fn attached_root_is_replaced_in_place() {
        let mut tree = Tree::new("x");
        let parent = tree.alloc(ExprKind::Not);
        let x = tree.alloc(ExprKind::Var(crate::ast::Span::new(0, 1)));
        tree.append_child(parent, x);
        let result = convert_to_dnf(&mut tree, x);
        assert_eq!(tree.parent(result), Some(parent));
        assert_eq!(tree.display(parent).to_string(), "Not{ Or{ And{ Var[x] } } }");
    }

    #[test]
    fn shared_literals_are_distinct_nodes() {
        let mut parser = Parser::new("( a & (b | c) )", Options::default());
        let expr = parser.parse_precond();
        let tree = parser.tree_mut();
        let result = convert_to_dnf(tree, expr);
        let firsts: Vec<_> = tree
            .children(result)
            .map(|clause| tree.first_child(clause).unwrap())
            .collect();
        assert_eq!(firsts.len(), 2);
        assert_ne!(firsts[0], firsts[1]);
        assert_eq!(tree.name(firsts[0]), Some("a"));
        assert_eq!(tree.name(firsts[1]), Some("a"));
    }

    #[test]
    fn partial_trees_do_not_crash() {
        let mut parser = Parser::new("( (a +) & ~ & (b | ) )", Options::default());
        let expr = parser.parse_precond();
        assert!(parser.diagnostics().has_errors());
        let tree = parser.tree_mut();
        let result = convert_to_dnf(tree, expr);
        assert_eq!(
            tree.display(result).to_string(),
            "Or{ And{ Plus{ Var[a] } Not } }"
        );
    }
}
