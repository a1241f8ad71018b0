//! # LiveEdit Editor
//!
//! In-place content editing for a live-rendered page.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ host: gestures, dialog intents, timers      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ dispatcher: target → nearest annotated node │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: capture → preview → commit/cancel  │
//! │  - single session slot                      │
//! │  - side attributes suppressed while open    │
//! │  - exact revert on cancel                   │
//! │  - highlight keyed per session              │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ vdom: RenderTree (live nodes)               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One focus**: at most one session is open; other triggers are dropped
//! 2. **Cancel is total**: every dismissal reverts value and side attributes
//! 3. **Highlight is cosmetic**: it never gates the lifecycle and stale
//!    timers never act on a newer session
//! 4. **Misses are silent**: unannotated or malformed targets do nothing
//!
//! ## Usage
//!
//! ```rust,ignore
//! use liveedit_editor::{EditController, EditorConfig, SurfaceIntent, Trigger, TriggerGesture};
//!
//! let mut controller = EditController::new(EditorConfig::default());
//!
//! // Gesture from the page
//! let outcome = controller.handle_trigger(&mut tree, Trigger::new(target, TriggerGesture::DoubleClick));
//! if outcome.prevent_default() {
//!     // show controller.surface()
//! }
//!
//! // Typing in the dialog previews live
//! controller.handle_intent(&mut tree, SurfaceIntent::Input { value: "New title".into() })?;
//!
//! // Save
//! controller.handle_intent(&mut tree, SurfaceIntent::Commit)?;
//! ```

mod annotation;
mod commit_log;
mod config;
mod controller;
mod dispatcher;
mod errors;
mod highlight;
mod preview;
mod revert;
mod session;
mod surface;

pub use annotation::{collect_annotated, derive_label, AnnotatedNode, Annotation, EditKind};
pub use commit_log::{CommitSink, CommittedEdit, MemoryCommitLog, PendingEdit};
pub use config::{EditorConfig, HighlightConfig, TriggerGesture, DEFAULT_CONFIG_NAME};
pub use controller::EditController;
pub use dispatcher::{resolve_target, DispatchOutcome, Trigger};
pub use errors::EditorError;
pub use highlight::{HighlightTimer, HighlightToken, Highlighter};
pub use preview::{apply_candidate, ValueChannel};
pub use revert::revert;
pub use session::{ClosedSession, CloseOutcome, EditSession, SessionId, SessionManager, SideAttribute};
pub use surface::{Dismissal, SurfaceIntent, SurfaceView};

// Re-export render tree types for convenience
pub use liveedit_vdom::{NodeId, RenderTree, VDocument, VNode};
