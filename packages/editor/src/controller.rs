//! # Edit Controller
//!
//! Wires the dispatcher, the session slot, the highlight effect and the
//! commit sink together. Hosts feed it gestures, surface intents and timer
//! callbacks; it never owns the render tree.
//!
//! Nothing on the gesture path surfaces an error to the end user: a trigger
//! that cannot be resolved or opened degrades to [`DispatchOutcome::Miss`].

use crate::{
    collect_annotated, dispatcher::resolve_target, AnnotatedNode, ClosedSession, CloseOutcome,
    CommitSink, CommittedEdit, DispatchOutcome, EditSession, EditorConfig, EditorError,
    HighlightToken, Highlighter, MemoryCommitLog, SessionManager, SurfaceIntent, SurfaceView,
    Trigger,
};
use liveedit_vdom::{NodeId, RenderTree};
use tracing::{debug, instrument, warn};

pub struct EditController<S: CommitSink = MemoryCommitLog> {
    config: EditorConfig,
    sessions: SessionManager,
    highlighter: Highlighter,
    sink: S,
}

impl EditController<MemoryCommitLog> {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_sink(config, MemoryCommitLog::new())
    }
}

impl Default for EditController<MemoryCommitLog> {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl<S: CommitSink> EditController<S> {
    pub fn with_sink(config: EditorConfig, sink: S) -> Self {
        Self {
            config,
            sessions: SessionManager::new(),
            highlighter: Highlighter::new(),
            sink,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn current(&self) -> Option<&EditSession> {
        self.sessions.current()
    }

    pub fn is_editing(&self) -> bool {
        self.sessions.is_open()
    }

    /// What the edit surface should show, if a session is open
    pub fn surface(&self) -> Option<SurfaceView> {
        self.sessions.current().map(SurfaceView::from_session)
    }

    /// Editable regions under `root`, for hosts that outline them
    pub fn editable_regions<T: RenderTree>(&self, tree: &T, root: NodeId) -> Vec<AnnotatedNode> {
        collect_annotated(tree, root, &self.config)
    }

    /// Handle a gesture on `trigger.target`
    #[instrument(level = "debug", skip(self, tree), fields(target = %trigger.target))]
    pub fn handle_trigger<T: RenderTree>(&mut self, tree: &mut T, trigger: Trigger) -> DispatchOutcome {
        if trigger.gesture != self.config.trigger {
            return DispatchOutcome::NotTrigger;
        }

        let Some(target) = resolve_target(tree, trigger.target, &self.config) else {
            debug!("No annotated ancestor");
            return DispatchOutcome::Miss;
        };

        if let Some(open) = self.sessions.current() {
            debug!(open = %open.id, "Session already open, ignoring trigger");
            return DispatchOutcome::Busy { open: open.id };
        }

        let (session, node) = match self.sessions.open_session(tree, target, &self.config) {
            Ok(session) => (session.id, session.target),
            Err(e) => {
                warn!(error = %e, "Could not open edit session");
                return DispatchOutcome::Miss;
            }
        };

        // Cosmetic only: a failed highlight never blocks the session
        let highlight = match self
            .highlighter
            .begin(tree, session, node, &self.config.highlight)
        {
            Ok(timer) => Some(timer),
            Err(e) => {
                warn!(%session, error = %e, "Highlight could not start");
                None
            }
        };

        DispatchOutcome::Opened { session, highlight }
    }

    /// Preview a candidate value on the open session
    pub fn apply_candidate<T: RenderTree>(&mut self, tree: &mut T, value: &str) -> Result<(), EditorError> {
        self.sessions.apply_candidate(tree, value)
    }

    pub fn commit<T: RenderTree>(&mut self, tree: &mut T) -> Result<ClosedSession, EditorError> {
        self.close_session(tree, CloseOutcome::Commit)
    }

    pub fn cancel<T: RenderTree>(&mut self, tree: &mut T) -> Result<ClosedSession, EditorError> {
        self.close_session(tree, CloseOutcome::Cancel)
    }

    /// Close the open session. The highlight ends with it, and a commit on a
    /// still-attached node goes to the sink.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn close_session<T: RenderTree>(
        &mut self,
        tree: &mut T,
        outcome: CloseOutcome,
    ) -> Result<ClosedSession, EditorError> {
        let id = self
            .sessions
            .current()
            .map(|s| s.id)
            .ok_or(EditorError::NoOpenSession)?;

        self.highlighter
            .clear(tree, HighlightToken::for_session(id));

        let closed = self.sessions.close_session(tree, outcome)?;
        if outcome == CloseOutcome::Commit && !closed.detached {
            self.sink.record(CommittedEdit::from_closed(&closed));
        }
        Ok(closed)
    }

    /// Route an intent from the edit surface
    pub fn handle_intent<T: RenderTree>(
        &mut self,
        tree: &mut T,
        intent: SurfaceIntent,
    ) -> Result<Option<ClosedSession>, EditorError> {
        if let SurfaceIntent::Input { value } = &intent {
            self.apply_candidate(tree, value)?;
            return Ok(None);
        }

        match intent.close_outcome() {
            Some(outcome) => self.close_session(tree, outcome).map(Some),
            None => Ok(None),
        }
    }

    /// Highlight timer callback from the host
    pub fn expire_highlight<T: RenderTree>(&mut self, tree: &mut T, token: HighlightToken) -> bool {
        self.highlighter.expire(tree, token)
    }
}
