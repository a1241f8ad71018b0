//! # Revert Engine
//!
//! Cancelling a session restores the node exactly as it was captured. The
//! primary value goes back through the same channel the preview used; side
//! attributes come back from their markers.

use crate::{EditSession, EditorError, SideAttribute, ValueChannel};
use liveedit_vdom::{NodeId, RenderTree, TreeError};
use tracing::debug;

pub fn revert<T: RenderTree>(tree: &mut T, session: &EditSession) -> Result<(), EditorError> {
    let node = session.target;

    match (&session.channel, &session.parked_children) {
        (ValueChannel::TextContent, Some(parked)) => tree.reattach_children(node, parked.clone())?,
        // Never previewed, nothing to undo
        (ValueChannel::TextContent, None) => {}
        (channel, _) if session.original_present => channel.write(tree, node, &session.original_value)?,
        (channel, _) => channel.clear(tree, node)?,
    }

    for side in &session.original_side_attributes {
        tree.set_attribute(node, &side.name, &side.value)?;
        restore_marker(tree, node, side)?;
    }

    debug!(
        session = %session.id,
        node = %node,
        side_attributes = session.original_side_attributes.len(),
        "Reverted node to captured state"
    );
    Ok(())
}

/// Settle a committed session: drop the parked markup and the side-channel
/// markers. The suppressed attributes stay off the node.
pub fn finalize<T: RenderTree>(tree: &mut T, session: &EditSession) -> Result<(), EditorError> {
    if let Some(parked) = &session.parked_children {
        tree.release_detached(parked);
    }
    for side in &session.original_side_attributes {
        restore_marker(tree, session.target, side)?;
    }
    Ok(())
}

fn restore_marker<T: RenderTree>(tree: &mut T, node: NodeId, side: &SideAttribute) -> Result<(), TreeError> {
    match &side.displaced {
        Some(value) => tree.set_attribute(node, &side.marker, value),
        None => tree.remove_attribute(node, &side.marker).map(|_| ()),
    }
}
