use smallvec::SmallVec;

use crate::ast::{ExprId, Tree};

/// Merges every `And`/`Or` child of an `And`/`Or` node of the same kind into its parent.
///
/// The grandchildren take the place of the merged child, in order, and the
/// emptied child is dropped from the tree. Applying the pass twice has the
/// same effect as applying it once.
pub fn flatten(tree: &mut Tree, root: ExprId) {
    let mut merged = 0usize;
    let mut node = Some(root);
    while let Some(n) = node {
        if tree.kind(n).is_associative() {
            merged += absorb_same_kind_children(tree, n);
        }
        // Only the children of `n` were relinked, so the cursor is still valid.
        node = tree.preorder_next(root, n);
    }
    if merged > 0 {
        log::trace!("Flattened {} nested node(s): {}", merged, tree.display(root));
    }
}

/// Splices the children of every same-kind child of `node` into `node`.
/// Returns the number of children merged.
fn absorb_same_kind_children(tree: &mut Tree, node: ExprId) -> usize {
    let kind = tree.kind(node);
    let mut merged = 0;
    let mut child = tree.first_child(node);
    while let Some(c) = child {
        if tree.kind(c) != kind {
            child = tree.next_sibling(c);
            continue;
        }
        let grandchildren: SmallVec<[ExprId; 8]> = tree.children(c).collect();
        let mut anchor = c;
        for gc in grandchildren {
            tree.unparent(gc);
            tree.insert_child(anchor, gc);
            anchor = gc;
        }
        // Continue with the first spliced grandchild, it may be of the same kind again.
        child = tree.next_sibling(c);
        tree.unparent(c);
        merged += 1;
    }
    merged
}
