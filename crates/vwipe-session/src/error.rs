//! Session precondition errors.
//!
//! These are rejected actions, not failed transitions: returning one of
//! these leaves the session state untouched. Remote and extraction failures
//! land in the `Error` state instead.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("No video frame is loaded")]
    NoFrameLoaded,

    #[error("No region is selected")]
    NoSelection,

    #[error("The selected region is too small to act on")]
    SelectionTooSmall,

    #[error("No API key is selected")]
    CredentialNotSelected,

    #[error("'{action}' is not available in the {state} state")]
    InvalidAction {
        action: &'static str,
        state: &'static str,
    },
}

impl SessionError {
    pub fn invalid_action(action: &'static str, state: &'static str) -> Self {
        Self::InvalidAction { action, state }
    }
}
