//! # LiveEdit VDOM
//!
//! Render-tree plumbing for the in-place editing controller.
//!
//! - [`RenderTree`]: the query/mutation surface the editor drives. Any
//!   tree-shaped render representation can implement it.
//! - [`VDocument`]: an arena-backed virtual DOM implementing [`RenderTree`],
//!   built from nested [`VNode`] descriptions.
//! - [`Visitor`]: depth-first traversal over any [`RenderTree`].

pub mod document;
pub mod error;
pub mod node;
pub mod tree;
pub mod visitor;

pub use document::VDocument;
pub use error::TreeError;
pub use node::{MountedNode, StyleMap, VNode};
pub use tree::{Ancestors, NodeId, RenderTree};
pub use visitor::{walk, walk_children, Visitor};
