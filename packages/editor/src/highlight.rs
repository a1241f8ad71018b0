//! # Highlight Effect
//!
//! Opening a session briefly emphasizes the target node. The effect layers
//! configured inline styles over a snapshot of the node's own inline styles
//! and, on expiry, puts that snapshot back.
//!
//! The host owns the clock. [`Highlighter::begin`] hands back a
//! [`HighlightTimer`]; the host schedules it and later calls
//! [`Highlighter::expire`] with the token. Tokens are per session instance,
//! so a timer that fires after its session was closed (and its effect
//! already cleared) finds nothing and does nothing, even if a newer session
//! now highlights the same node.

use crate::{HighlightConfig, SessionId};
use liveedit_vdom::{NodeId, RenderTree, StyleMap, TreeError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightToken(SessionId);

impl HighlightToken {
    pub fn for_session(session: SessionId) -> Self {
        Self(session)
    }

    pub fn session(self) -> SessionId {
        self.0
    }
}

/// Expiry the host must schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightTimer {
    pub token: HighlightToken,
    pub delay_ms: u64,
}

impl HighlightTimer {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone)]
struct ActiveHighlight {
    token: HighlightToken,
    node: NodeId,
    restore: StyleMap,
}

#[derive(Debug, Default)]
pub struct Highlighter {
    active: Vec<ActiveHighlight>,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the effect to `node` on behalf of `session`
    pub fn begin<T: RenderTree>(
        &mut self,
        tree: &mut T,
        session: SessionId,
        node: NodeId,
        config: &HighlightConfig,
    ) -> Result<HighlightTimer, TreeError> {
        // A lingering effect on the same node would otherwise end up in the
        // snapshot and be restored as if it were the node's own styling.
        let lingering: Vec<HighlightToken> = self
            .active
            .iter()
            .filter(|h| h.node == node)
            .map(|h| h.token)
            .collect();
        for token in lingering {
            self.clear(tree, token);
        }

        let restore = match tree.inline_styles(node) {
            Some(styles) => styles.clone(),
            None if tree.contains(node) => return Err(TreeError::NotAnElement(node)),
            None => return Err(TreeError::NodeNotFound(node)),
        };

        let mut styles = restore.clone();
        styles.extend(config.styles.iter().map(|(k, v)| (k.clone(), v.clone())));
        tree.set_inline_styles(node, styles)?;

        let token = HighlightToken::for_session(session);
        self.active.push(ActiveHighlight {
            token,
            node,
            restore,
        });

        debug!(%session, node = %node, delay_ms = config.duration_ms, "Highlight started");
        Ok(HighlightTimer {
            token,
            delay_ms: config.duration_ms,
        })
    }

    /// Timer callback. Returns `false` for stale or unknown tokens.
    pub fn expire<T: RenderTree>(&mut self, tree: &mut T, token: HighlightToken) -> bool {
        let cleared = self.clear(tree, token);
        if !cleared {
            debug!(session = %token.session(), "Ignoring stale highlight timer");
        }
        cleared
    }

    /// End the effect early (session closed). Returns `false` if it had
    /// already ended.
    pub fn clear<T: RenderTree>(&mut self, tree: &mut T, token: HighlightToken) -> bool {
        let Some(index) = self.active.iter().position(|h| h.token == token) else {
            return false;
        };
        let highlight = self.active.remove(index);

        // A node that re-rendered away has nothing left to restore
        if let Err(e) = tree.set_inline_styles(highlight.node, highlight.restore) {
            debug!(node = %highlight.node, error = %e, "Highlight target gone");
        }
        true
    }

    pub fn is_active(&self, token: HighlightToken) -> bool {
        self.active.iter().any(|h| h.token == token)
    }
}
