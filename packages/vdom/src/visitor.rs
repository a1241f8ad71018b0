use crate::{NodeId, RenderTree};

/// Depth-first traversal over a [`RenderTree`]
///
/// Default implementations walk the entire subtree. Override `visit_element`
/// or `visit_text` to act on nodes; call [`walk_children`] to keep descending.
pub trait Visitor<T: RenderTree>: Sized {
    fn visit_element(&mut self, tree: &T, node: NodeId) {
        walk_children(self, tree, node);
    }

    fn visit_text(&mut self, _tree: &T, _node: NodeId) {
        // Leaf node, no children to walk
    }
}

pub fn walk<T: RenderTree, V: Visitor<T>>(visitor: &mut V, tree: &T, node: NodeId) {
    if tree.tag(node).is_some() {
        visitor.visit_element(tree, node);
    } else if tree.contains(node) {
        visitor.visit_text(tree, node);
    }
}

pub fn walk_children<T: RenderTree, V: Visitor<T>>(
    visitor: &mut V,
    tree: &T,
    node: NodeId,
) {
    for &child in tree.children(node) {
        walk(visitor, tree, child);
    }
}
