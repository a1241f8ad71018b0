//! # Render Tree Abstraction
//!
//! The editing controller never talks to a concrete UI framework. It drives a
//! tree-shaped render representation through [`RenderTree`]: a retained
//! virtual DOM, a widget tree, or a binding onto a live browser document.
//!
//! Handles are non-owning. A [`NodeId`] may outlive its node (the page
//! re-rendered), so every query tolerates missing nodes and every mutation
//! reports [`TreeError::NodeNotFound`].

use crate::{StyleMap, TreeError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-owning handle to a node in a render tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Query and mutation surface of a render tree
pub trait RenderTree {
    /// Whether the handle still points at a live node
    fn contains(&self, node: NodeId) -> bool;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Child handles in render order (empty for text and missing nodes)
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Element tag; `None` for text nodes and missing nodes
    fn tag(&self, node: NodeId) -> Option<&str>;

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), TreeError>;

    /// Remove an attribute, returning its previous value
    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<Option<String>, TreeError>;

    /// Rendered text of the subtree, markup stripped
    fn text_content(&self, node: NodeId) -> Option<String>;

    /// Replace the subtree's content with a single text run.
    ///
    /// An empty string leaves the node without children.
    fn set_text_content(&mut self, node: NodeId, content: &str) -> Result<(), TreeError>;

    /// Unlink `node`'s children without freeing them.
    ///
    /// The returned handles stay live but parentless until they are passed to
    /// [`RenderTree::reattach_children`] or [`RenderTree::release_detached`].
    fn detach_children(&mut self, node: NodeId) -> Result<Vec<NodeId>, TreeError>;

    /// Make previously detached subtrees the children of `node` again,
    /// freeing whatever children it has now
    fn reattach_children(&mut self, node: NodeId, children: Vec<NodeId>) -> Result<(), TreeError>;

    /// Free detached subtrees. Handles that are attached or already gone are
    /// left alone.
    fn release_detached(&mut self, nodes: &[NodeId]);

    fn inline_styles(&self, node: NodeId) -> Option<&StyleMap>;

    fn set_inline_styles(&mut self, node: NodeId, styles: StyleMap) -> Result<(), TreeError>;

    /// Iterate `node` and then each of its ancestors up to the root
    fn ancestors(&self, node: NodeId) -> Ancestors<'_, Self> {
        Ancestors {
            tree: self,
            next: self.contains(node).then_some(node),
        }
    }
}

/// Ancestor-or-self iterator returned by [`RenderTree::ancestors`]
pub struct Ancestors<'a, T: ?Sized> {
    tree: &'a T,
    next: Option<NodeId>,
}

impl<T: RenderTree + ?Sized> Iterator for Ancestors<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
