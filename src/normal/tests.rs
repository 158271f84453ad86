use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use super::*;
use crate::ast::{ExprId, ExprKind, Span, Tree};

const VARS: usize = 6;

/// A random propositional formula over `VARS` variables, built into a tree on demand.
/// `Less(l, r)` holds if `l` is false and `r` is true, its operands are formulas again.
#[derive(Debug, Clone)]
enum Formula {
    Var(usize),
    Less(Box<Formula>, Box<Formula>),
    Not(Box<Formula>),
    And(Vec<Formula>),
    Or(Vec<Formula>),
}

fn arbitrary_formula(g: &mut Gen, depth: usize) -> Formula {
    let choices = if depth == 0 { 2 } else { 5 };
    match usize::arbitrary(g) % choices {
        0 => Formula::Var(usize::arbitrary(g) % VARS),
        1 => Formula::Less(
            Box::new(comparison_operand(g, depth)),
            Box::new(comparison_operand(g, depth)),
        ),
        2 => Formula::Not(Box::new(arbitrary_formula(g, depth - 1))),
        3 => Formula::And(arbitrary_operands(g, depth - 1)),
        _ => Formula::Or(arbitrary_operands(g, depth - 1)),
    }
}

fn comparison_operand(g: &mut Gen, depth: usize) -> Formula {
    if depth == 0 {
        Formula::Var(usize::arbitrary(g) % VARS)
    } else {
        arbitrary_formula(g, depth - 1)
    }
}

fn arbitrary_operands(g: &mut Gen, depth: usize) -> Vec<Formula> {
    let width = 1 + usize::arbitrary(g) % 3;
    (0..width).map(|_| arbitrary_formula(g, depth)).collect()
}

impl Arbitrary for Formula {
    fn arbitrary(g: &mut Gen) -> Self {
        arbitrary_formula(g, 3)
    }
}

/// A shallow formula, so that conjoining a few of them keeps the DNF small.
#[derive(Debug, Clone)]
struct Operand(Formula);

impl Arbitrary for Operand {
    fn arbitrary(g: &mut Gen) -> Self {
        Operand(arbitrary_formula(g, 2))
    }
}

impl Formula {
    fn eval(&self, env: u32) -> bool {
        match self {
            Formula::Var(v) => env & (1 << v) != 0,
            Formula::Less(l, r) => !l.eval(env) && r.eval(env),
            Formula::Not(f) => !f.eval(env),
            Formula::And(fs) => fs.iter().all(|f| f.eval(env)),
            Formula::Or(fs) => fs.iter().any(|f| f.eval(env)),
        }
    }
}

/// `v0 v1 v2 ...`, every name is two characters wide.
fn source() -> String {
    (0..VARS).map(|i| format!("v{}", i)).collect::<Vec<_>>().join(" ")
}

fn var(tree: &mut Tree, v: usize) -> ExprId {
    tree.alloc(ExprKind::Var(Span::new(3 * v, 3 * v + 2)))
}

fn build(tree: &mut Tree, f: &Formula) -> ExprId {
    let (kind, operands): (ExprKind, Vec<ExprId>) = match f {
        Formula::Var(v) => return var(tree, *v),
        Formula::Less(l, r) => (ExprKind::Less, vec![build(tree, l), build(tree, r)]),
        Formula::Not(f) => (ExprKind::Not, vec![build(tree, f)]),
        Formula::And(fs) => (ExprKind::And, fs.iter().map(|f| build(tree, f)).collect()),
        Formula::Or(fs) => (ExprKind::Or, fs.iter().map(|f| build(tree, f)).collect()),
    };
    let node = tree.alloc(kind);
    for op in operands {
        tree.append_child(node, op);
    }
    node
}

fn eval(tree: &Tree, id: ExprId, env: u32) -> bool {
    let mut children = tree.children(id);
    match tree.kind(id) {
        ExprKind::Var(_) => {
            let v: usize = tree.name(id).unwrap()[1..].parse().unwrap();
            env & (1 << v) != 0
        }
        ExprKind::Less => {
            let l = children.next().unwrap();
            let r = children.next().unwrap();
            !eval(tree, l, env) && eval(tree, r, env)
        }
        ExprKind::Not => !eval(tree, children.next().unwrap(), env),
        ExprKind::And => children.all(|c| eval(tree, c, env)),
        ExprKind::Or => children.any(|c| eval(tree, c, env)),
        k => panic!("unexpected node {}", k),
    }
}

fn equivalent(f: &Formula, tree: &Tree, id: ExprId) -> bool {
    (0..1u32 << VARS).all(|env| f.eval(env) == eval(tree, id, env))
}

#[quickcheck]
fn flatten_is_idempotent(f: Formula) -> bool {
    let mut tree = Tree::new(source());
    let root = build(&mut tree, &f);
    flatten(&mut tree, root);
    let once = tree.display(root).to_string();
    flatten(&mut tree, root);
    is_flat(&tree, root) && once == tree.display(root).to_string()
}

#[quickcheck]
fn flatten_preserves_meaning(f: Formula) -> bool {
    let mut tree = Tree::new(source());
    let root = build(&mut tree, &f);
    flatten(&mut tree, root);
    equivalent(&f, &tree, root)
}

#[quickcheck]
fn nnf_invariant(f: Formula) -> bool {
    let mut tree = Tree::new(source());
    let root = build(&mut tree, &f);
    let nnf = convert_to_nnf(&mut tree, root);
    is_nnf(&tree, nnf) && is_flat(&tree, nnf) && equivalent(&f, &tree, nnf)
}

#[quickcheck]
fn double_negation_is_eliminated(f: Formula) -> bool {
    let mut tree = Tree::new(source());
    let plain = build(&mut tree, &f);
    let plain = convert_to_nnf(&mut tree, plain);
    let negated = build(&mut tree, &Formula::Not(Box::new(Formula::Not(Box::new(f)))));
    let negated = convert_to_nnf(&mut tree, negated);
    tree.display(plain).to_string() == tree.display(negated).to_string()
}

#[quickcheck]
fn de_morgan_preserves_operand_order(a: Formula, b: Formula) -> bool {
    let mut tree = Tree::new(source());
    let not_a = build(&mut tree, &Formula::Not(Box::new(a.clone())));
    let not_b = build(&mut tree, &Formula::Not(Box::new(b.clone())));
    let expected = tree.alloc(ExprKind::Or);
    tree.append_child(expected, not_a);
    tree.append_child(expected, not_b);
    let expected = convert_to_nnf(&mut tree, expected);

    let actual = build(&mut tree, &Formula::Not(Box::new(Formula::And(vec![a, b]))));
    let actual = convert_to_nnf(&mut tree, actual);
    tree.display(expected).to_string() == tree.display(actual).to_string()
}

#[quickcheck]
fn dnf_shape_and_meaning(f: Formula) -> bool {
    let mut tree = Tree::new(source());
    let root = build(&mut tree, &f);
    let dnf = convert_to_dnf(&mut tree, root);
    is_dnf(&tree, dnf) && equivalent(&f, &tree, dnf)
}

#[quickcheck]
fn dnf_clause_count_is_product(ops: Vec<Operand>) -> bool {
    let fs: Vec<Formula> = ops.into_iter().take(3).map(|op| op.0).collect();
    if fs.is_empty() {
        return true;
    }
    let mut tree = Tree::new(source());
    let expected: usize = fs
        .iter()
        .map(|f| {
            let root = build(&mut tree, f);
            let dnf = convert_to_dnf(&mut tree, root);
            tree.child_count(dnf)
        })
        .product();

    let root = build(&mut tree, &Formula::And(fs));
    let dnf = convert_to_dnf(&mut tree, root);
    tree.child_count(dnf) == expected
}

#[test]
fn comparisons_of_formulas_are_normalized() {
    // v0 < ~(v1 & ~~v2)
    let f = Formula::Less(
        Box::new(Formula::Var(0)),
        Box::new(Formula::Not(Box::new(Formula::And(vec![
            Formula::Var(1),
            Formula::Not(Box::new(Formula::Not(Box::new(Formula::Var(2))))),
        ])))),
    );
    let mut tree = Tree::new(source());
    let root = build(&mut tree, &f);
    assert!(!is_nnf(&tree, root));
    let nnf = convert_to_nnf(&mut tree, root);
    assert!(is_nnf(&tree, nnf));
    assert!(equivalent(&f, &tree, nnf));
    assert_eq!(
        tree.display(nnf).to_string(),
        "Less{ Var[v0] Or{ Not{ Var[v1] } Not{ Var[v2] } } }"
    );
}

#[test]
fn vacuous_cases() {
    let mut tree = Tree::new("");
    let and = tree.alloc(ExprKind::And);
    let dnf = convert_to_dnf(&mut tree, and);
    assert_eq!(tree.display(dnf).to_string(), "Or");

    let or = tree.alloc(ExprKind::Or);
    let dnf = convert_to_dnf(&mut tree, or);
    assert_eq!(tree.display(dnf).to_string(), "Or");
}

#[test]
fn literal_classification() {
    let mut tree = Tree::new(source());
    let x = var(&mut tree, 0);
    let not = tree.alloc(ExprKind::Not);
    tree.append_child(not, x);
    assert!(is_literal(&tree, x));
    assert!(is_literal(&tree, not));

    let and = tree.alloc(ExprKind::And);
    let outer = tree.alloc(ExprKind::Not);
    tree.append_child(outer, and);
    assert!(!is_literal(&tree, and));
    assert!(!is_literal(&tree, outer));
    assert!(!is_nnf(&tree, outer));
}
