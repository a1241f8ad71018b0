//! # Live Preview
//!
//! Candidate values go straight onto the live node so the page shows the
//! edit as it will look. Nothing is validated beyond what the channel itself
//! accepts: empty values are allowed and no content policy applies here.

use crate::{EditKind, EditSession, EditorConfig, EditorError};
use liveedit_vdom::{NodeId, RenderTree, TreeError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where a node's editable value lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "camelCase")]
pub enum ValueChannel {
    /// Rendered text of the node (a write replaces nested markup)
    TextContent,
    /// A single attribute, e.g. an image source
    Attribute(String),
}

impl ValueChannel {
    pub fn for_kind(kind: EditKind, config: &EditorConfig) -> Self {
        match kind {
            EditKind::Text => ValueChannel::TextContent,
            EditKind::Image => ValueChannel::Attribute(config.image_source_attribute.clone()),
        }
    }

    /// Current value; `None` when the node is gone or the attribute is absent
    pub fn read<T: RenderTree>(&self, tree: &T, node: NodeId) -> Option<String> {
        match self {
            ValueChannel::TextContent => tree.text_content(node),
            ValueChannel::Attribute(name) => tree.attribute(node, name).map(str::to_string),
        }
    }

    pub fn write<T: RenderTree>(&self, tree: &mut T, node: NodeId, value: &str) -> Result<(), TreeError> {
        match self {
            ValueChannel::TextContent => tree.set_text_content(node, value),
            ValueChannel::Attribute(name) => tree.set_attribute(node, name, value),
        }
    }

    /// Put the channel back into its "no value" state
    pub fn clear<T: RenderTree>(&self, tree: &mut T, node: NodeId) -> Result<(), TreeError> {
        match self {
            ValueChannel::TextContent => tree.set_text_content(node, ""),
            ValueChannel::Attribute(name) => tree.remove_attribute(node, name).map(|_| ()),
        }
    }
}

/// Write `value` onto the session's node and remember it as the candidate
pub fn apply_candidate<T: RenderTree>(
    tree: &mut T,
    session: &mut EditSession,
    value: &str,
) -> Result<(), EditorError> {
    if !session.is_open {
        return Err(EditorError::NoOpenSession);
    }

    // Park the original markup once; later writes only replace preview text
    if session.channel == ValueChannel::TextContent && session.parked_children.is_none() {
        session.parked_children = Some(tree.detach_children(session.target)?);
    }

    session.channel.write(tree, session.target, value)?;
    session.candidate = value.to_string();

    debug!(session = %session.id, node = %session.target, len = value.len(), "Applied preview candidate");
    Ok(())
}
