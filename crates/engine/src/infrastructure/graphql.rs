//! GraphQL client for the catalog server.
//!
//! Implements the SceneTagPort trait over the server's single `/graphql`
//! endpoint, authenticating with the session cookie handed over by the host.

use std::time::Duration;

use async_trait::async_trait;
use markertag_domain::{SceneId, TagId};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::infrastructure::ports::{GraphqlError, SceneTagPort};

/// Default request timeout. A hung server is reported as a transport error.
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Name of the cookie carrying the host session.
const SESSION_COOKIE_NAME: &str = "session";

const FIND_SCENE_TAGS: &str = r#"
    query FindScene($id: ID!) {
        findScene(id: $id) {
            tags {
                id
            }
        }
    }
"#;

const UPDATE_SCENE_TAGS: &str = r#"
    mutation SceneUpdate($input: SceneUpdateInput!) {
        sceneUpdate(input: $input) {
            id
        }
    }
"#;

/// Where and how to reach the catalog server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphqlEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub session_cookie: Option<String>,
}

impl GraphqlEndpoint {
    pub fn url(&self) -> Result<Url, GraphqlError> {
        endpoint_url(&self.scheme, &self.host, self.port)
    }
}

/// Build `{scheme}://{host}:{port}/graphql`.
///
/// A server bound to the unspecified address `0.0.0.0` cannot be dialed, so
/// that host is rewritten to `localhost`.
pub fn endpoint_url(scheme: &str, host: &str, port: u16) -> Result<Url, GraphqlError> {
    let host = if host == "0.0.0.0" { "localhost" } else { host };
    let raw = format!("{scheme}://{host}:{port}/graphql");
    Url::parse(&raw).map_err(|e| GraphqlError::InvalidEndpoint(format!("{raw}: {e}")))
}

/// Client for the catalog server's GraphQL API
#[derive(Clone)]
pub struct GraphqlClient {
    client: Client,
    url: Url,
}

impl GraphqlClient {
    pub fn new(endpoint: &GraphqlEndpoint, timeout: Duration) -> Result<Self, GraphqlError> {
        let url = endpoint.url()?;

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers(endpoint.session_cookie.as_deref())?)
            .build()
            .map_err(|e| GraphqlError::Transport(e.to_string()))?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Send one GraphQL document and return its `data`.
    pub async fn execute(&self, query: &str, variables: Option<Value>) -> Result<Value, GraphqlError> {
        let request = GraphqlRequest { query, variables };

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| GraphqlError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| GraphqlError::Transport(e.to_string()))?;

        interpret_response(status, &body)
    }
}

fn default_headers(session_cookie: Option<&str>) -> Result<HeaderMap, GraphqlError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::DNT, HeaderValue::from_static("1"));

    if let Some(value) = session_cookie {
        let cookie = HeaderValue::from_str(&format!("{SESSION_COOKIE_NAME}={value}"))
            .map_err(|e| GraphqlError::InvalidEndpoint(format!("session cookie: {e}")))?;
        headers.insert(header::COOKIE, cookie);
    }

    Ok(headers)
}

/// Turn a raw HTTP response into the GraphQL `data` value or a typed error.
pub fn interpret_response(status: StatusCode, body: &[u8]) -> Result<Value, GraphqlError> {
    match status {
        StatusCode::OK => {}
        StatusCode::UNAUTHORIZED => return Err(GraphqlError::Unauthorized),
        other => {
            return Err(GraphqlError::Status {
                status: other.as_u16(),
                body: String::from_utf8_lossy(body).into_owned(),
            })
        }
    }

    let response: GraphqlResponse = serde_json::from_slice(body)
        .map_err(|e| GraphqlError::invalid_response(format!("body is not GraphQL JSON: {e}")))?;

    let errors = response.error_messages();
    if !errors.is_empty() {
        return Err(GraphqlError::Graphql(errors));
    }

    match response.data {
        Some(Value::Null) | None => Err(GraphqlError::invalid_response("response carried no data")),
        Some(data) => Ok(data),
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variables: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<Value>>,
    /// Older servers nest errors as `{"error": {"errors": [...]}}`.
    #[serde(default)]
    error: Option<LegacyErrorEnvelope>,
}

#[derive(Debug, Deserialize)]
struct LegacyErrorEnvelope {
    #[serde(default)]
    errors: Vec<Value>,
}

impl GraphqlResponse {
    fn error_messages(&self) -> Vec<String> {
        let top_level = self.errors.iter().flatten();
        let legacy = self.error.iter().flat_map(|e| e.errors.iter());
        top_level.chain(legacy).map(error_message).collect()
    }
}

fn error_message(error: &Value) -> String {
    error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FindSceneData {
    #[serde(default)]
    find_scene: Option<SceneTagsNode>,
}

#[derive(Debug, Deserialize)]
struct SceneTagsNode {
    #[serde(default)]
    tags: Option<Vec<TagNode>>,
}

#[derive(Debug, Deserialize)]
struct TagNode {
    id: TagId,
}

#[derive(Debug, Serialize)]
struct SceneUpdateInput<'a> {
    id: &'a SceneId,
    tag_ids: &'a [TagId],
}

/// Extract tag ids from a `FindScene` response.
fn parse_scene_tags(scene_id: &SceneId, data: Value) -> Result<Vec<TagId>, GraphqlError> {
    let data: FindSceneData = serde_json::from_value(data)
        .map_err(|e| GraphqlError::invalid_response(format!("findScene: {e}")))?;

    let scene = data
        .find_scene
        .ok_or_else(|| GraphqlError::not_found("Scene", scene_id))?;

    Ok(scene
        .tags
        .unwrap_or_default()
        .into_iter()
        .map(|tag| tag.id)
        .collect())
}

#[async_trait]
impl SceneTagPort for GraphqlClient {
    async fn scene_tags(&self, scene_id: &SceneId) -> Result<Vec<TagId>, GraphqlError> {
        let variables = serde_json::json!({ "id": scene_id });
        let data = self.execute(FIND_SCENE_TAGS, Some(variables)).await?;
        parse_scene_tags(scene_id, data)
    }

    async fn set_scene_tags(
        &self,
        scene_id: &SceneId,
        tag_ids: Vec<TagId>,
    ) -> Result<Value, GraphqlError> {
        let input = SceneUpdateInput {
            id: scene_id,
            tag_ids: &tag_ids,
        };
        let variables = serde_json::json!({ "input": input });
        self.execute(UPDATE_SCENE_TAGS, Some(variables)).await
    }
}
