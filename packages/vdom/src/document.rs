//! # Virtual Document
//!
//! Arena-backed render tree. Nested [`VNode`] descriptions are mounted into
//! slots addressed by [`NodeId`].
//!
//! Slots are never reused: removing a subtree tombstones its slots, so a
//! handle captured before a re-render stays dead instead of silently pointing
//! at an unrelated node.

use crate::{MountedNode, NodeId, RenderTree, StyleMap, TreeError, VNode};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: String,
        attributes: HashMap<String, String>,
        styles: StyleMap,
    },
    Text {
        content: String,
    },
}

#[derive(Debug, Clone)]
struct Slot {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable virtual DOM
#[derive(Debug, Clone, Default)]
pub struct VDocument {
    slots: Vec<Option<Slot>>,
    roots: Vec<NodeId>,
}

impl VDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a list of root nodes
    pub fn from_roots(roots: Vec<VNode>) -> Self {
        let mut doc = Self::new();
        for root in roots {
            doc.mount(root);
        }
        doc
    }

    /// Parse a JSON array of [`VNode`] roots
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let roots: Vec<VNode> = serde_json::from_str(json)?;
        Ok(Self::from_roots(roots))
    }

    /// Serialize the live tree back to a JSON array of roots
    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(&self.to_vnodes())?)
    }

    /// Serialize the live tree with each node's handle attached
    pub fn to_mounted_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string(&self.mounted())?)
    }

    /// Mount a new root subtree
    pub fn mount(&mut self, node: VNode) -> NodeId {
        let id = self.insert(node, None);
        self.roots.push(id);
        id
    }

    /// Append a subtree under an existing element
    pub fn append_child(&mut self, parent: NodeId, node: VNode) -> Result<NodeId, TreeError> {
        match self.slot(parent).map(|slot| &slot.data) {
            Some(NodeData::Element { .. }) => {}
            Some(NodeData::Text { .. }) => return Err(TreeError::NotAnElement(parent)),
            None => return Err(TreeError::NodeNotFound(parent)),
        }

        let id = self.insert(node, Some(parent));
        if let Some(slot) = self.slot_mut(parent) {
            slot.children.push(id);
        }
        Ok(id)
    }

    /// Detach and drop a subtree, returning its last rendered description
    pub fn remove(&mut self, node: NodeId) -> Result<VNode, TreeError> {
        let snapshot = self.to_vnode(node).ok_or(TreeError::NodeNotFound(node))?;

        match self.parent(node) {
            Some(parent) => {
                if let Some(slot) = self.slot_mut(parent) {
                    slot.children.retain(|c| *c != node);
                }
            }
            None => self.roots.retain(|r| *r != node),
        }

        let dropped = self.tombstone(node);
        debug!(node = %node, dropped, "Removed subtree");
        Ok(snapshot)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First element (document order) whose attribute `name` equals `value`
    pub fn find_by_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if self.attribute(id, name) == Some(value) {
                return Some(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        None
    }

    /// Nested description of a live subtree
    pub fn to_vnode(&self, node: NodeId) -> Option<VNode> {
        let slot = self.slot(node)?;
        Some(match &slot.data {
            NodeData::Text { content } => VNode::text(content.clone()),
            NodeData::Element {
                tag,
                attributes,
                styles,
            } => VNode::Element {
                tag: tag.clone(),
                attributes: attributes.clone(),
                styles: styles.clone(),
                children: slot
                    .children
                    .iter()
                    .filter_map(|c| self.to_vnode(*c))
                    .collect(),
            },
        })
    }

    pub fn to_vnodes(&self) -> Vec<VNode> {
        self.roots.iter().filter_map(|r| self.to_vnode(*r)).collect()
    }

    /// Like [`VDocument::to_vnode`], keeping the handle of every node
    pub fn to_mounted(&self, node: NodeId) -> Option<MountedNode> {
        let slot = self.slot(node)?;
        Some(match &slot.data {
            NodeData::Text { content } => MountedNode::Text {
                id: node,
                content: content.clone(),
            },
            NodeData::Element {
                tag,
                attributes,
                styles,
            } => MountedNode::Element {
                id: node,
                tag: tag.clone(),
                attributes: attributes.clone(),
                styles: styles.clone(),
                children: slot
                    .children
                    .iter()
                    .filter_map(|c| self.to_mounted(*c))
                    .collect(),
            },
        })
    }

    pub fn mounted(&self) -> Vec<MountedNode> {
        self.roots.iter().filter_map(|r| self.to_mounted(*r)).collect()
    }

    fn insert(&mut self, node: VNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.slots.len() as u32);

        let (data, children) = match node {
            VNode::Text { content } => (NodeData::Text { content }, Vec::new()),
            VNode::Element {
                tag,
                attributes,
                styles,
                children,
            } => (
                NodeData::Element {
                    tag,
                    attributes,
                    styles,
                },
                children,
            ),
        };

        self.slots.push(Some(Slot {
            data,
            parent,
            children: Vec::new(),
        }));

        let child_ids: Vec<NodeId> = children
            .into_iter()
            .map(|child| self.insert(child, Some(id)))
            .collect();

        if let Some(slot) = self.slot_mut(id) {
            slot.children = child_ids;
        }
        id
    }

    /// Free a subtree's slots, returning how many were dropped
    fn tombstone(&mut self, node: NodeId) -> usize {
        let Some(slot) = self
            .slots
            .get_mut(node.index() as usize)
            .and_then(Option::take)
        else {
            return 0;
        };

        1 + slot
            .children
            .into_iter()
            .map(|child| self.tombstone(child))
            .sum::<usize>()
    }

    fn slot(&self, node: NodeId) -> Option<&Slot> {
        self.slots.get(node.index() as usize)?.as_ref()
    }

    fn slot_mut(&mut self, node: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(node.index() as usize)?.as_mut()
    }

    fn element_mut(
        &mut self,
        node: NodeId,
    ) -> Result<(&mut HashMap<String, String>, &mut StyleMap), TreeError> {
        let slot = self.slot_mut(node).ok_or(TreeError::NodeNotFound(node))?;
        match &mut slot.data {
            NodeData::Element {
                attributes, styles, ..
            } => Ok((attributes, styles)),
            NodeData::Text { .. } => Err(TreeError::NotAnElement(node)),
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let Some(slot) = self.slot(node) else {
            return;
        };
        match &slot.data {
            NodeData::Text { content } => out.push_str(content),
            NodeData::Element { .. } => {
                for child in &slot.children {
                    self.collect_text(*child, out);
                }
            }
        }
    }
}

impl RenderTree for VDocument {
    fn contains(&self, node: NodeId) -> bool {
        self.slot(node).is_some()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node)?.parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        match self.slot(node) {
            Some(slot) => &slot.children,
            None => &[],
        }
    }

    fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.slot(node)?.data {
            NodeData::Element { tag, .. } => Some(tag),
            NodeData::Text { .. } => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.slot(node)?.data {
            NodeData::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeData::Text { .. } => None,
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), TreeError> {
        let (attributes, _) = self.element_mut(node)?;
        attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) -> Result<Option<String>, TreeError> {
        let (attributes, _) = self.element_mut(node)?;
        Ok(attributes.remove(name))
    }

    fn text_content(&self, node: NodeId) -> Option<String> {
        self.slot(node)?;
        let mut out = String::new();
        self.collect_text(node, &mut out);
        Some(out)
    }

    fn set_text_content(&mut self, node: NodeId, content: &str) -> Result<(), TreeError> {
        let slot = self.slot_mut(node).ok_or(TreeError::NodeNotFound(node))?;

        if let NodeData::Text { content: current } = &mut slot.data {
            *current = content.to_string();
            return Ok(());
        }

        let old_children = std::mem::take(&mut slot.children);
        for child in old_children {
            self.tombstone(child);
        }

        if !content.is_empty() {
            let text = self.insert(VNode::text(content), Some(node));
            if let Some(slot) = self.slot_mut(node) {
                slot.children.push(text);
            }
        }
        Ok(())
    }

    fn detach_children(&mut self, node: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let slot = self.slot_mut(node).ok_or(TreeError::NodeNotFound(node))?;
        let children = std::mem::take(&mut slot.children);

        for child in &children {
            if let Some(slot) = self.slot_mut(*child) {
                slot.parent = None;
            }
        }
        debug!(node = %node, count = children.len(), "Detached children");
        Ok(children)
    }

    fn reattach_children(&mut self, node: NodeId, children: Vec<NodeId>) -> Result<(), TreeError> {
        match self.slot(node).map(|slot| &slot.data) {
            Some(NodeData::Element { .. }) => {}
            Some(NodeData::Text { .. }) => return Err(TreeError::NotAnElement(node)),
            None => return Err(TreeError::NodeNotFound(node)),
        }

        let current = self
            .slot_mut(node)
            .map(|slot| std::mem::take(&mut slot.children))
            .unwrap_or_default();
        for child in current {
            self.tombstone(child);
        }

        let children: Vec<NodeId> = children
            .into_iter()
            .filter(|c| self.parent(*c).is_none() && !self.roots.contains(c) && self.contains(*c))
            .collect();
        for child in &children {
            if let Some(slot) = self.slot_mut(*child) {
                slot.parent = Some(node);
            }
        }
        if let Some(slot) = self.slot_mut(node) {
            slot.children = children;
        }
        Ok(())
    }

    fn release_detached(&mut self, nodes: &[NodeId]) {
        for node in nodes {
            if self.contains(*node) && self.parent(*node).is_none() && !self.roots.contains(node) {
                self.tombstone(*node);
            }
        }
    }

    fn inline_styles(&self, node: NodeId) -> Option<&StyleMap> {
        match &self.slot(node)?.data {
            NodeData::Element { styles, .. } => Some(styles),
            NodeData::Text { .. } => None,
        }
    }

    fn set_inline_styles(&mut self, node: NodeId, styles: StyleMap) -> Result<(), TreeError> {
        let (_, current) = self.element_mut(node)?;
        *current = styles;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph() -> VNode {
        VNode::element("p")
            .with_attr("id", "intro")
            .with_child(VNode::text("Hello "))
            .with_child(VNode::element("strong").with_child(VNode::text("there")))
    }

    #[test]
    fn test_mount_assigns_parents() {
        let mut doc = VDocument::new();
        let root = doc.mount(paragraph());

        let strong = doc.children(root)[1];
        let inner_text = doc.children(strong)[0];

        assert_eq!(doc.parent(strong), Some(root));
        assert_eq!(doc.parent(root), None);
        assert_eq!(doc.ancestors(inner_text).collect::<Vec<_>>(), vec![inner_text, strong, root]);
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        let mut doc = VDocument::new();
        let root = doc.mount(paragraph());
        assert_eq!(doc.text_content(root).as_deref(), Some("Hello there"));
    }

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut doc = VDocument::new();
        let root = doc.mount(paragraph());
        let strong = doc.children(root)[1];

        doc.set_text_content(root, "Hi").unwrap();

        assert_eq!(doc.text_content(root).as_deref(), Some("Hi"));
        assert_eq!(doc.children(root).len(), 1);
        assert!(!doc.contains(strong));
    }

    #[test]
    fn test_set_empty_text_content_leaves_no_children() {
        let mut doc = VDocument::new();
        let root = doc.mount(paragraph());

        doc.set_text_content(root, "").unwrap();

        assert!(doc.children(root).is_empty());
        assert_eq!(doc.text_content(root).as_deref(), Some(""));
    }

    #[test]
    fn test_attribute_ops_reject_text_nodes() {
        let mut doc = VDocument::new();
        let root = doc.mount(paragraph());
        let text = doc.children(root)[0];

        assert_eq!(doc.set_attribute(text, "class", "x"), Err(TreeError::NotAnElement(text)));
        assert_eq!(
            doc.remove_attribute(NodeId::new(99), "class"),
            Err(TreeError::NodeNotFound(NodeId::new(99)))
        );
    }

    #[test]
    fn test_remove_keeps_handles_dead() {
        let mut doc = VDocument::new();
        let root = doc.mount(paragraph());
        let strong = doc.children(root)[1];

        let removed = doc.remove(strong).unwrap();
        assert_eq!(removed.text_content(), "there");

        // New nodes never reuse the freed slot
        let em = doc.append_child(root, VNode::element("em")).unwrap();
        assert_ne!(em, strong);
        assert!(!doc.contains(strong));
        assert_eq!(doc.tag(strong), None);
    }

    #[test]
    fn test_json_roundtrip_preserves_structure() {
        let doc = VDocument::from_roots(vec![paragraph()]);
        let json = doc.to_json().unwrap();
        let reloaded = VDocument::from_json(&json).unwrap();

        assert_eq!(reloaded.to_vnodes(), vec![paragraph()]);
    }

    #[test]
    fn test_reattach_restores_original_children() {
        let mut doc = VDocument::new();
        let root = doc.mount(paragraph());
        let strong = doc.children(root)[1];

        let parked = doc.detach_children(root).unwrap();
        doc.set_text_content(root, "Hi").unwrap();
        assert_eq!(doc.text_content(root).as_deref(), Some("Hi"));
        assert!(doc.contains(strong));

        doc.reattach_children(root, parked).unwrap();

        assert_eq!(doc.to_vnode(root), Some(paragraph()));
        assert_eq!(doc.ancestors(strong).last(), Some(root));
        assert_eq!(doc.len(), 4);
    }

    #[test]
    fn test_release_detached_frees_only_parked_nodes() {
        let mut doc = VDocument::new();
        let root = doc.mount(paragraph());
        let parked = doc.detach_children(root).unwrap();

        doc.release_detached(&parked);
        doc.release_detached(&[root]);

        assert!(parked.iter().all(|c| !doc.contains(*c)));
        assert!(doc.contains(root));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_is_empty_tracks_live_nodes() {
        let mut doc = VDocument::new();
        assert!(doc.is_empty());

        let root = doc.mount(paragraph());
        assert!(!doc.is_empty());

        doc.remove(root).unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.len(), 0);
    }

    #[test]
    fn test_mounted_carries_live_handles() {
        let mut doc = VDocument::new();
        let root = doc.mount(paragraph());
        doc.set_text_content(root, "Hi").unwrap();
        let text = doc.children(root)[0];

        let mounted = doc.mounted();
        let MountedNode::Element { id, children, .. } = &mounted[0] else {
            panic!("expected an element root");
        };
        assert_eq!(*id, root);
        assert_eq!(
            children,
            &vec![MountedNode::Text {
                id: text,
                content: "Hi".to_string()
            }]
        );

        let json: serde_json::Value = serde_json::from_str(&doc.to_mounted_json().unwrap()).unwrap();
        assert_eq!(json[0]["children"][0]["id"], text.index());
    }

    #[test]
    fn test_find_by_attribute() {
        let doc = VDocument::from_roots(vec![VNode::element("div").with_child(paragraph())]);
        let found = doc.find_by_attribute("id", "intro").unwrap();
        assert_eq!(doc.tag(found), Some("p"));
        assert!(doc.find_by_attribute("id", "missing").is_none());
    }
}
