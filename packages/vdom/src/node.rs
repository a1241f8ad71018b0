use crate::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inline style declarations of an element (property → value)
pub type StyleMap = HashMap<String, String>;

/// Nested description of a render subtree
///
/// This is the exchange format for whole trees (page templates, JSON from a
/// host, snapshots in tests). Live nodes are addressed through
/// [`crate::VDocument`] once mounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        #[serde(default)]
        attributes: HashMap<String, String>,
        #[serde(default)]
        styles: StyleMap,
        #[serde(default)]
        children: Vec<VNode>,
    },

    /// Text node
    Text { content: String },
}

/// A live node as a host sees it: [`VNode`] content plus the handle that
/// addresses it. Handles survive edits elsewhere in the tree, so hosts should
/// read them from here rather than count nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MountedNode {
    Element {
        id: NodeId,
        tag: String,
        #[serde(default)]
        attributes: HashMap<String, String>,
        #[serde(default)]
        styles: StyleMap,
        #[serde(default)]
        children: Vec<MountedNode>,
    },

    Text { id: NodeId, content: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: HashMap::new(),
            styles: StyleMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    /// Rendered text of this subtree (markup stripped)
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(content),
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}
