//! # Commit Log
//!
//! Committing finalizes the previewed value on the live page. Getting it into
//! a backing store is somebody else's job: the controller hands every commit
//! to a [`CommitSink`]. [`MemoryCommitLog`] keeps them as pending edits until
//! a persistence layer confirms or rejects each one.

use crate::{ClosedSession, EditKind, SessionId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A finalized edit, keyed by its annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedEdit {
    pub session: SessionId,
    pub page_key: String,
    pub edit_key: String,
    pub kind: EditKind,
    pub value: String,
    /// Value before the session opened
    pub previous: String,
}

impl CommittedEdit {
    pub fn from_closed(closed: &ClosedSession) -> Self {
        let session = &closed.session;
        Self {
            session: session.id,
            page_key: session.annotation.page_key.clone(),
            edit_key: session.annotation.edit_key.clone(),
            kind: session.kind,
            value: session.candidate.clone(),
            previous: session.original_value.clone(),
        }
    }
}

/// Receiver of committed edits
pub trait CommitSink {
    fn record(&mut self, edit: CommittedEdit);
}

/// Discards commits
impl CommitSink for () {
    fn record(&mut self, _edit: CommittedEdit) {}
}

/// Commit waiting for persistence acknowledgment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEdit {
    pub id: String,
    pub edit: CommittedEdit,
}

#[derive(Debug, Default)]
pub struct MemoryCommitLog {
    pending: Vec<PendingEdit>,
    next_id: u64,
}

impl MemoryCommitLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &[PendingEdit] {
        &self.pending
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Most recent pending value for a (page, key) pair
    pub fn latest(&self, page_key: &str, edit_key: &str) -> Option<&CommittedEdit> {
        self.pending
            .iter()
            .rev()
            .map(|p| &p.edit)
            .find(|e| e.page_key == page_key && e.edit_key == edit_key)
    }

    /// Persistence accepted the edit. Returns `false` for unknown ids.
    pub fn confirm(&mut self, id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Persistence refused the edit; hand it back to the caller
    pub fn reject(&mut self, id: &str) -> Option<PendingEdit> {
        let index = self.pending.iter().position(|p| p.id == id)?;
        Some(self.pending.remove(index))
    }

    /// Take everything pending, oldest first
    pub fn drain(&mut self) -> Vec<PendingEdit> {
        std::mem::take(&mut self.pending)
    }
}

impl CommitSink for MemoryCommitLog {
    fn record(&mut self, edit: CommittedEdit) {
        let id = format!("commit-{}", self.next_id);
        self.next_id += 1;

        debug!(%id, page_key = %edit.page_key, edit_key = %edit.edit_key, "Recorded committed edit");
        self.pending.push(PendingEdit { id, edit });
    }
}
