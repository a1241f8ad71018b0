//! # Interaction Dispatcher
//!
//! Turns a raw gesture on some node into "edit this annotated region". The
//! target is often nested inline markup inside the editable region (a `<b>`
//! in a paragraph), so resolution walks up to the nearest ancestor-or-self
//! with a well-formed annotation.

use crate::{AnnotatedNode, EditorConfig, HighlightTimer, SessionId, TriggerGesture};
use liveedit_vdom::{NodeId, RenderTree};
use serde::{Deserialize, Serialize};

/// A gesture delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    pub target: NodeId,
    pub gesture: TriggerGesture,
}

impl Trigger {
    pub fn new(target: NodeId, gesture: TriggerGesture) -> Self {
        Self { target, gesture }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DispatchOutcome {
    /// Not the configured trigger gesture
    NotTrigger,

    /// No annotated ancestor; the gesture proceeds as usual
    Miss,

    /// Another session holds focus; the trigger is dropped
    Busy { open: SessionId },

    /// A session opened on the resolved node
    Opened {
        session: SessionId,
        /// Highlight expiry to schedule, if the effect could start
        highlight: Option<HighlightTimer>,
    },
}

impl DispatchOutcome {
    /// Whether the host should suppress the gesture's default behavior
    pub fn prevent_default(&self) -> bool {
        matches!(self, DispatchOutcome::Opened { .. })
    }
}

/// Nearest ancestor-or-self of `target` carrying a well-formed annotation
pub fn resolve_target<T: RenderTree>(
    tree: &T,
    target: NodeId,
    config: &EditorConfig,
) -> Option<AnnotatedNode> {
    tree.ancestors(target)
        .find_map(|node| AnnotatedNode::read(tree, node, config))
}
