//! # Annotation Model
//!
//! The page renderer marks editable nodes with two attributes: an edit key,
//! opaque and unique within its page, and a page key naming the namespace.
//! Both must be present and non-empty; anything else is not an editable
//! region.
//!
//! The kind of edit is never stored. It follows from how the node renders:
//! image tags edit their source, everything else edits its text.

use crate::EditorConfig;
use liveedit_vdom::{walk_children, NodeId, RenderTree, Visitor};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Text,
    Image,
}

impl EditKind {
    /// Infer the kind from the node's rendering role
    pub fn of<T: RenderTree>(tree: &T, node: NodeId, config: &EditorConfig) -> Self {
        match tree.tag(node) {
            Some(tag) if config.is_image_tag(tag) => EditKind::Image,
            _ => EditKind::Text,
        }
    }
}

/// (page, key) identity of an editable node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub page_key: String,
    pub edit_key: String,
}

impl Annotation {
    /// Read a well-formed annotation off a node
    pub fn read<T: RenderTree>(tree: &T, node: NodeId, config: &EditorConfig) -> Option<Self> {
        let edit_key = non_empty(tree.attribute(node, &config.edit_key_attribute))?;
        let page_key = non_empty(tree.attribute(node, &config.page_key_attribute))?;

        Some(Self {
            page_key: page_key.to_string(),
            edit_key: edit_key.to_string(),
        })
    }

    /// Human-readable label for the edit surface
    pub fn label(&self) -> String {
        derive_label(&self.edit_key)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Turn an edit key into a title: separators become single spaces and each
/// word gets an upper-case first letter (`hero_title` → `Hero Title`).
pub fn derive_label(edit_key: &str) -> String {
    edit_key
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A live node carrying a well-formed annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedNode {
    pub node: NodeId,
    pub annotation: Annotation,
    pub kind: EditKind,
}

impl AnnotatedNode {
    pub fn read<T: RenderTree>(tree: &T, node: NodeId, config: &EditorConfig) -> Option<Self> {
        let annotation = Annotation::read(tree, node, config)?;
        Some(Self {
            node,
            annotation,
            kind: EditKind::of(tree, node, config),
        })
    }
}

/// Every editable region under `root`, in document order
pub fn collect_annotated<T: RenderTree>(
    tree: &T,
    root: NodeId,
    config: &EditorConfig,
) -> Vec<AnnotatedNode> {
    let mut collector = AnnotationCollector {
        config,
        found: Vec::new(),
    };
    liveedit_vdom::walk(&mut collector, tree, root);
    collector.found
}

struct AnnotationCollector<'c> {
    config: &'c EditorConfig,
    found: Vec<AnnotatedNode>,
}

impl<T: RenderTree> Visitor<T> for AnnotationCollector<'_> {
    fn visit_element(&mut self, tree: &T, node: NodeId) {
        if let Some(annotated) = AnnotatedNode::read(tree, node, self.config) {
            self.found.push(annotated);
        }
        walk_children(self, tree, node);
    }
}
