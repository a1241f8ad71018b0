//! Error types for the editor

use crate::SessionId;
use liveedit_vdom::TreeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Render tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("No edit session is open")]
    NoOpenSession,

    #[error("Edit session {0} is already open")]
    SessionAlreadyOpen(SessionId),

    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
