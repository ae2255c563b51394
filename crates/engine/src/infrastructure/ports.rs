//! Port traits for infrastructure boundaries.
//!
//! The catalog server is the only external system this hook talks to, so
//! there is exactly one port: reading and replacing a scene's tags.

use async_trait::async_trait;
use markertag_domain::{SceneId, TagId};

// =============================================================================
// Error Types
// =============================================================================

/// Failures talking to the catalog server's GraphQL endpoint.
#[derive(Debug, thiserror::Error)]
pub enum GraphqlError {
    /// The request never produced a response (connect error, timeout).
    #[error("[FATAL] Error with the graphql request: {0}")]
    Transport(String),

    /// The server rejected the session cookie.
    #[error("HTTP Error 401, Unauthorised.")]
    Unauthorized,

    /// Any other non-200 status, with the raw response body.
    #[error("GraphQL query failed: {status} - {body}")]
    Status { status: u16, body: String },

    /// The server answered 200 but reported GraphQL errors.
    #[error("GraphQL error: {}", .0.join("; "))]
    Graphql(Vec<String>),

    /// The queried entity does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: String },

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The connection info does not form a usable URL.
    #[error("Invalid GraphQL endpoint: {0}")]
    InvalidEndpoint(String),
}

impl GraphqlError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    pub fn invalid_response(message: impl ToString) -> Self {
        Self::InvalidResponse(message.to_string())
    }

    /// Errors the host treats as fatal to the whole plugin run rather than
    /// to this one operation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Unauthorized)
    }
}

// =============================================================================
// Scene Tag Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SceneTagPort: Send + Sync {
    /// Current tag ids of a scene, in server order.
    async fn scene_tags(&self, scene_id: &SceneId) -> Result<Vec<TagId>, GraphqlError>;

    /// Replace a scene's tag list. Returns the raw mutation `data`.
    async fn set_scene_tags(
        &self,
        scene_id: &SceneId,
        tag_ids: Vec<TagId>,
    ) -> Result<serde_json::Value, GraphqlError>;
}
