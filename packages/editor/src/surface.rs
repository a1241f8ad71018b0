//! # Edit Surface
//!
//! The dialog the editor types into. It is a projection of the open session
//! and a source of intents; it holds no state of its own.
//!
//! Every way of dismissing the dialog means cancel, so no dismissal path can
//! skip the revert.

use crate::{CloseOutcome, EditKind, EditSession, SessionId};
use serde::{Deserialize, Serialize};

/// What the dialog renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceView {
    pub session: SessionId,
    pub label: String,
    pub page_key: String,
    pub edit_key: String,
    pub kind: EditKind,
    /// Current candidate value
    pub value: String,
}

impl SurfaceView {
    pub fn from_session(session: &EditSession) -> Self {
        Self {
            session: session.id,
            label: session.label.clone(),
            page_key: session.annotation.page_key.clone(),
            edit_key: session.annotation.edit_key.clone(),
            kind: session.kind,
            value: session.candidate.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dismissal {
    Backdrop,
    CloseIcon,
    Escape,
    CancelButton,
}

/// User intent forwarded by the dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceIntent {
    /// The field changed; preview it
    Input { value: String },
    Commit,
    Dismiss { via: Dismissal },
}

impl SurfaceIntent {
    /// How this intent closes the session, if it does
    pub fn close_outcome(&self) -> Option<CloseOutcome> {
        match self {
            SurfaceIntent::Input { .. } => None,
            SurfaceIntent::Commit => Some(CloseOutcome::Commit),
            SurfaceIntent::Dismiss { .. } => Some(CloseOutcome::Cancel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_dismissal_cancels() {
        for via in [
            Dismissal::Backdrop,
            Dismissal::CloseIcon,
            Dismissal::Escape,
            Dismissal::CancelButton,
        ] {
            let intent = SurfaceIntent::Dismiss { via };
            assert_eq!(intent.close_outcome(), Some(CloseOutcome::Cancel));
        }
        assert_eq!(SurfaceIntent::Commit.close_outcome(), Some(CloseOutcome::Commit));
        assert_eq!(
            SurfaceIntent::Input { value: String::new() }.close_outcome(),
            None
        );
    }

    #[test]
    fn test_intent_json_shape() {
        let intent: SurfaceIntent =
            serde_json::from_str(r#"{ "type": "dismiss", "via": "closeIcon" }"#).unwrap();
        assert_eq!(intent, SurfaceIntent::Dismiss { via: Dismissal::CloseIcon });

        let intent: SurfaceIntent =
            serde_json::from_str(r#"{ "type": "input", "value": "Hi" }"#).unwrap();
        assert_eq!(intent, SurfaceIntent::Input { value: "Hi".to_string() });
    }
}
