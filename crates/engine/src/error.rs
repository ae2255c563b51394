//! Errors surfaced by a hook run.
//!
//! Every failure ends the run; `main` turns it into the terminal result
//! object and a failing exit status.

use thiserror::Error;

use crate::infrastructure::ports::GraphqlError;

#[derive(Debug, Error)]
pub enum HookError {
    /// Stdin did not hold a valid invocation payload.
    #[error("Invalid hook payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// The payload parsed but carried unusable values.
    #[error("Invalid hook payload: {0}")]
    InvalidPayload(String),

    /// Talking to the catalog server failed.
    #[error(transparent)]
    Graphql(#[from] GraphqlError),
}

impl HookError {
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }

    /// Transport failures and rejected sessions abort the plugin as a whole.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Graphql(e) if e.is_fatal())
    }
}
