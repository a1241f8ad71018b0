//! # Edit Session Management
//!
//! An EditSession is one in-progress edit of one annotated node. It carries
//! everything needed to undo the edit: the original primary value and every
//! side attribute that was suppressed so the preview could show through.
//!
//! [`SessionManager`] owns the single session slot. At most one session is
//! open at any time; opening while one is open is refused.

use crate::{
    preview, revert, AnnotatedNode, Annotation, EditKind, EditorConfig, EditorError, ValueChannel,
};
use liveedit_vdom::{NodeId, RenderTree, TreeError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Identity of one session instance (never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Attribute removed from the live node for the duration of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideAttribute {
    pub name: String,
    /// Marker attribute holding the value while suppressed
    pub marker: String,
    pub value: String,
    /// What the node already had under the marker name, put back on close
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displaced: Option<String>,
}

/// Single edit of one annotated node
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub id: SessionId,

    /// Live node being edited (non-owning)
    pub target: NodeId,

    pub kind: EditKind,

    pub annotation: Annotation,

    /// Title shown on the edit surface
    pub label: String,

    /// Channel used for preview and revert, fixed at open time
    pub channel: ValueChannel,

    /// Value at open time (empty when the channel had none)
    pub original_value: String,

    /// Whether the channel carried a value at open time
    pub original_present: bool,

    pub original_side_attributes: Vec<SideAttribute>,

    /// Original children of a text target, unlinked on the first preview so
    /// cancel can put the exact markup back
    pub parked_children: Option<Vec<NodeId>>,

    /// Last value written by the preview
    pub candidate: String,

    pub is_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CloseOutcome {
    Commit,
    Cancel,
}

/// A session after it left the slot
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedSession {
    pub session: EditSession,
    pub outcome: CloseOutcome,

    /// The target vanished before close (page re-rendered); nothing was
    /// written back
    pub detached: bool,
}

/// Owner of the single-focus session slot
#[derive(Debug, Default)]
pub struct SessionManager {
    slot: Option<EditSession>,
    next_id: u64,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&EditSession> {
        self.slot.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.slot.is_some()
    }

    /// Capture the node's state and open a session on it
    ///
    /// For image nodes every configured side attribute present on the node
    /// is moved onto a marker attribute so it cannot override the preview.
    pub fn open_session<T: RenderTree>(
        &mut self,
        tree: &mut T,
        target: AnnotatedNode,
        config: &EditorConfig,
    ) -> Result<&EditSession, EditorError> {
        if let Some(open) = &self.slot {
            return Err(EditorError::SessionAlreadyOpen(open.id));
        }
        if !tree.contains(target.node) {
            return Err(TreeError::NodeNotFound(target.node).into());
        }

        let channel = ValueChannel::for_kind(target.kind, config);
        let original = channel.read(tree, target.node);

        let original_side_attributes = match target.kind {
            EditKind::Image => suppress_side_attributes(tree, target.node, config)?,
            EditKind::Text => Vec::new(),
        };

        self.next_id += 1;
        let original_value = original.clone().unwrap_or_default();
        let session = EditSession {
            id: SessionId(self.next_id),
            target: target.node,
            kind: target.kind,
            label: target.annotation.label(),
            annotation: target.annotation,
            channel,
            candidate: original_value.clone(),
            original_value,
            original_present: original.is_some(),
            original_side_attributes,
            parked_children: None,
            is_open: true,
        };

        info!(
            session = %session.id,
            node = %session.target,
            page_key = %session.annotation.page_key,
            edit_key = %session.annotation.edit_key,
            kind = ?session.kind,
            "Opened edit session"
        );

        Ok(&*self.slot.insert(session))
    }

    /// Preview a candidate value on the open session
    pub fn apply_candidate<T: RenderTree>(&mut self, tree: &mut T, value: &str) -> Result<(), EditorError> {
        let session = self.slot.as_mut().ok_or(EditorError::NoOpenSession)?;
        preview::apply_candidate(tree, session, value)
    }

    /// Close the open session, reverting on cancel
    ///
    /// The slot is released whatever happens next.
    pub fn close_session<T: RenderTree>(
        &mut self,
        tree: &mut T,
        outcome: CloseOutcome,
    ) -> Result<ClosedSession, EditorError> {
        let mut session = self.slot.take().ok_or(EditorError::NoOpenSession)?;
        session.is_open = false;

        let detached = !tree.contains(session.target);
        if detached {
            warn!(session = %session.id, node = %session.target, ?outcome, "Target detached, discarding session");
            if let Some(parked) = &session.parked_children {
                tree.release_detached(parked);
            }
        } else {
            match outcome {
                CloseOutcome::Cancel => revert::revert(tree, &session)?,
                CloseOutcome::Commit => revert::finalize(tree, &session)?,
            }
        }

        info!(session = %session.id, ?outcome, detached, "Closed edit session");

        Ok(ClosedSession {
            session,
            outcome,
            detached,
        })
    }
}

fn suppress_side_attributes<T: RenderTree>(
    tree: &mut T,
    node: NodeId,
    config: &EditorConfig,
) -> Result<Vec<SideAttribute>, TreeError> {
    let mut captured = Vec::new();

    for name in &config.suppressed_attributes {
        if let Some(value) = tree.remove_attribute(node, name)? {
            let marker = config.marker_for(name);
            let displaced = tree.attribute(node, &marker).map(str::to_string);
            tree.set_attribute(node, &marker, &value)?;
            debug!(node = %node, attribute = %name, "Suppressed side attribute");
            captured.push(SideAttribute {
                name: name.clone(),
                marker,
                value,
                displaced,
            });
        }
    }

    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use liveedit_vdom::{VDocument, VNode};

    fn annotated(doc: &VDocument, node: NodeId) -> AnnotatedNode {
        AnnotatedNode::read(doc, node, &EditorConfig::default()).unwrap()
    }

    fn hero_image() -> VNode {
        VNode::element("img")
            .with_attr("data-edit-key", "hero_image")
            .with_attr("data-page-key", "home")
            .with_attr("src", "a.png")
            .with_attr("srcset", "a.png 1x, a2.png 2x")
    }

    #[test]
    fn test_session_creation() {
        let config = EditorConfig::default();
        let mut doc = VDocument::new();
        let p = doc.mount(
            VNode::element("p")
                .with_attr("data-edit-key", "intro_text")
                .with_attr("data-page-key", "about")
                .with_child(VNode::text("Hello")),
        );

        let mut sessions = SessionManager::new();
        let target = annotated(&doc, p);
        let session = sessions.open_session(&mut doc, target, &config).unwrap();

        assert_eq!(session.id, SessionId::new(1));
        assert_eq!(session.kind, EditKind::Text);
        assert_eq!(session.label, "Intro Text");
        assert_eq!(session.original_value, "Hello");
        assert_eq!(session.candidate, "Hello");
        assert!(session.original_side_attributes.is_empty());
        assert!(session.is_open);
        assert!(sessions.is_open());
    }

    #[test]
    fn test_open_suppresses_responsive_sources() {
        let config = EditorConfig::default();
        let mut doc = VDocument::new();
        let img = doc.mount(hero_image());

        let mut sessions = SessionManager::new();
        let target = annotated(&doc, img);
        let session = sessions.open_session(&mut doc, target, &config).unwrap();

        assert_eq!(session.original_value, "a.png");
        assert_eq!(
            session.original_side_attributes,
            vec![SideAttribute {
                name: "srcset".to_string(),
                marker: "data-liveedit-suppressed-srcset".to_string(),
                value: "a.png 1x, a2.png 2x".to_string(),
                displaced: None,
            }]
        );
        assert_eq!(doc.attribute(img, "srcset"), None);
        assert_eq!(doc.attribute(img, "data-liveedit-suppressed-srcset"), Some("a.png 1x, a2.png 2x"));
    }

    #[test]
    fn test_second_open_is_refused() {
        let config = EditorConfig::default();
        let mut doc = VDocument::new();
        let img = doc.mount(hero_image());

        let mut sessions = SessionManager::new();
        let target = annotated(&doc, img);
        sessions.open_session(&mut doc, target, &config).unwrap();
        let target = annotated(&doc, img);
        let result = sessions.open_session(&mut doc, target, &config);

        assert!(matches!(result, Err(EditorError::SessionAlreadyOpen(id)) if id == SessionId::new(1)));
    }

    #[test]
    fn test_cancel_restores_image_and_side_attributes() {
        let config = EditorConfig::default();
        let mut doc = VDocument::new();
        let img = doc.mount(hero_image());
        let before = doc.to_vnode(img);

        let mut sessions = SessionManager::new();
        let target = annotated(&doc, img);
        sessions.open_session(&mut doc, target, &config).unwrap();
        sessions.apply_candidate(&mut doc, "b.png").unwrap();
        assert_eq!(doc.attribute(img, "src"), Some("b.png"));

        let closed = sessions.close_session(&mut doc, CloseOutcome::Cancel).unwrap();

        assert!(!closed.detached);
        assert!(!closed.session.is_open);
        assert_eq!(doc.to_vnode(img), before);
        assert!(!sessions.is_open());
    }

    #[test]
    fn test_commit_keeps_candidate_and_drops_markers() {
        let config = EditorConfig::default();
        let mut doc = VDocument::new();
        let img = doc.mount(hero_image());

        let mut sessions = SessionManager::new();
        let target = annotated(&doc, img);
        sessions.open_session(&mut doc, target, &config).unwrap();
        sessions.apply_candidate(&mut doc, "b.png").unwrap();
        sessions.close_session(&mut doc, CloseOutcome::Commit).unwrap();

        assert_eq!(doc.attribute(img, "src"), Some("b.png"));
        assert_eq!(doc.attribute(img, "srcset"), None);
        assert_eq!(doc.attribute(img, "data-liveedit-suppressed-srcset"), None);
    }

    #[test]
    fn test_marker_name_already_in_use_survives_close() {
        let config = EditorConfig::default();

        for outcome in [CloseOutcome::Cancel, CloseOutcome::Commit] {
            let mut doc = VDocument::new();
            let img = doc.mount(hero_image().with_attr("data-liveedit-suppressed-srcset", "host-owned"));
            let before = doc.to_vnode(img);

            let mut sessions = SessionManager::new();
            let target = annotated(&doc, img);
            let session = sessions.open_session(&mut doc, target, &config).unwrap();
            assert_eq!(
                session.original_side_attributes[0].displaced.as_deref(),
                Some("host-owned")
            );

            sessions.close_session(&mut doc, outcome).unwrap();

            assert_eq!(doc.attribute(img, "data-liveedit-suppressed-srcset"), Some("host-owned"));
            if outcome == CloseOutcome::Cancel {
                assert_eq!(doc.to_vnode(img), before);
            }
        }
    }

    #[test]
    fn test_cancel_keeps_nested_markup_and_handles() {
        let config = EditorConfig::default();
        let mut doc = VDocument::new();
        let original = VNode::element("p")
            .with_attr("data-edit-key", "intro")
            .with_attr("data-page-key", "home")
            .with_child(VNode::text("Hello "))
            .with_child(VNode::element("b").with_child(VNode::text("world")));
        let p = doc.mount(original.clone());
        let bold = doc.children(p)[1];

        let mut sessions = SessionManager::new();
        let target = annotated(&doc, p);
        sessions.open_session(&mut doc, target, &config).unwrap();
        sessions.apply_candidate(&mut doc, "Hi").unwrap();
        sessions.apply_candidate(&mut doc, "Hey").unwrap();
        sessions.close_session(&mut doc, CloseOutcome::Cancel).unwrap();

        assert_eq!(doc.to_vnode(p), Some(original));
        assert!(doc.contains(bold));
        assert_eq!(doc.parent(bold), Some(p));
    }

    #[test]
    fn test_commit_frees_parked_markup() {
        let config = EditorConfig::default();
        let mut doc = VDocument::new();
        let p = doc.mount(
            VNode::element("p")
                .with_attr("data-edit-key", "intro")
                .with_attr("data-page-key", "home")
                .with_child(VNode::element("b").with_child(VNode::text("world"))),
        );
        let bold = doc.children(p)[0];

        let mut sessions = SessionManager::new();
        let target = annotated(&doc, p);
        sessions.open_session(&mut doc, target, &config).unwrap();
        sessions.apply_candidate(&mut doc, "Hi").unwrap();
        sessions.close_session(&mut doc, CloseOutcome::Commit).unwrap();

        assert_eq!(doc.text_content(p).as_deref(), Some("Hi"));
        assert!(!doc.contains(bold));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_cancel_removes_source_that_was_absent() {
        let config = EditorConfig::default();
        let mut doc = VDocument::new();
        let img = doc.mount(
            VNode::element("img")
                .with_attr("data-edit-key", "logo")
                .with_attr("data-page-key", "home"),
        );

        let mut sessions = SessionManager::new();
        let target = annotated(&doc, img);
        let session = sessions.open_session(&mut doc, target, &config).unwrap();
        assert!(!session.original_present);

        sessions.apply_candidate(&mut doc, "logo.svg").unwrap();
        sessions.close_session(&mut doc, CloseOutcome::Cancel).unwrap();

        assert_eq!(doc.attribute(img, "src"), None);
    }

    #[test]
    fn test_close_detached_target_discards_without_writing() {
        let config = EditorConfig::default();
        let mut doc = VDocument::new();
        let img = doc.mount(hero_image());

        let mut sessions = SessionManager::new();
        let target = annotated(&doc, img);
        sessions.open_session(&mut doc, target, &config).unwrap();
        doc.remove(img).unwrap();

        let closed = sessions.close_session(&mut doc, CloseOutcome::Cancel).unwrap();
        assert!(closed.detached);
        assert!(!sessions.is_open());
    }

    #[test]
    fn test_close_without_session() {
        let mut doc = VDocument::new();
        let mut sessions = SessionManager::new();
        let result = sessions.close_session(&mut doc, CloseOutcome::Commit);
        assert!(matches!(result, Err(EditorError::NoOpenSession)));
    }
}
