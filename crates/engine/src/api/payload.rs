//! Invocation payload sent by the host on stdin.
//!
//! Only the fields the hook consumes are modelled; everything else the host
//! sends is ignored.

use std::io::Read;
use std::path::{Path, PathBuf};

use markertag_domain::{MarkerTagEvent, SceneId, TagId};
use serde::Deserialize;

use crate::error::HookError;
use crate::infrastructure::graphql::GraphqlEndpoint;

#[derive(Debug, Clone, Deserialize)]
pub struct HookPayload {
    pub server_connection: ServerConnection,
    #[serde(default)]
    pub args: HookArgs,
}

impl HookPayload {
    pub fn from_reader(reader: impl Read) -> Result<Self, HookError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn parse(raw: &str) -> Result<Self, HookError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn plugin_dir(&self) -> Option<&Path> {
        self.server_connection.plugin_dir.as_deref()
    }

    /// The marker event carried by the hook context. A payload without a
    /// hook context yields an event with no scene.
    pub fn marker_event(&self) -> MarkerTagEvent {
        self.args
            .hook_context
            .as_ref()
            .and_then(|ctx| ctx.input.as_ref())
            .map(MarkerInput::to_event)
            .unwrap_or_default()
    }
}

/// Connection info for the catalog server, keyed the way the host sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerConnection {
    pub scheme: String,
    pub host: String,
    pub port: RawPort,
    #[serde(default)]
    pub session_cookie: Option<SessionCookie>,
    #[serde(default)]
    pub plugin_dir: Option<PathBuf>,
}

impl ServerConnection {
    pub fn endpoint(&self) -> Result<GraphqlEndpoint, HookError> {
        Ok(GraphqlEndpoint {
            scheme: self.scheme.clone(),
            host: self.host.clone(),
            port: self.port.value()?,
            session_cookie: self.session_cookie.as_ref().map(|c| c.value.clone()),
        })
    }
}

/// The host's session cookie. Only its value is sent back; the cookie name
/// is fixed by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SessionCookie {
    pub value: String,
}

/// Ports arrive as numbers from current hosts and as strings from older ones.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPort {
    Number(u16),
    Text(String),
}

impl RawPort {
    pub fn value(&self) -> Result<u16, HookError> {
        match self {
            Self::Number(port) => Ok(*port),
            Self::Text(raw) => raw
                .trim()
                .parse()
                .map_err(|_| HookError::invalid_payload(format!("invalid port: {raw}"))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookArgs {
    #[serde(rename = "hookContext", default)]
    pub hook_context: Option<HookContext>,
}

/// The hook context also carries the hook id, type and `inputFields`; none
/// of them affect the sync and they are left unparsed.
#[derive(Debug, Clone, Deserialize)]
pub struct HookContext {
    #[serde(default)]
    pub input: Option<MarkerInput>,
}

/// Mutation input of the marker that fired the hook.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkerInput {
    #[serde(default)]
    pub scene_id: Option<RawId>,
    #[serde(default)]
    pub primary_tag_id: Option<RawId>,
    #[serde(default)]
    pub tag_ids: Option<Vec<RawId>>,
}

impl MarkerInput {
    /// Empty ids are treated as absent.
    pub fn to_event(&self) -> MarkerTagEvent {
        MarkerTagEvent {
            scene_id: self
                .scene_id
                .as_ref()
                .and_then(|id| SceneId::new(id.to_string()).ok()),
            primary_tag_id: self
                .primary_tag_id
                .as_ref()
                .and_then(|id| TagId::new(id.to_string()).ok()),
            tag_ids: self.tag_ids.as_ref().map(|ids| {
                ids.iter()
                    .filter_map(|id| TagId::new(id.to_string()).ok())
                    .collect()
            }),
        }
    }
}

/// An id as it appears in hook input: usually a string, sometimes a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}
