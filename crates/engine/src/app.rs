//! Application composition.

use std::sync::Arc;

use markertag_domain::MarkerTagEvent;

use crate::api::payload::HookPayload;
use crate::error::HookError;
use crate::infrastructure::{
    graphql::GraphqlClient,
    ports::SceneTagPort,
    settings::{self, HookSettings},
};
use crate::use_cases::{SyncMarkerTags, SyncOutcome};

/// Main application state for one hook run.
pub struct App {
    pub sync_marker_tags: SyncMarkerTags,
}

impl App {
    pub fn new(scenes: Arc<dyn SceneTagPort>, settings: &HookSettings) -> Self {
        Self {
            sync_marker_tags: SyncMarkerTags::new(scenes, settings.all_tags),
        }
    }

    /// Wire the GraphQL client described by the payload's connection info.
    pub fn from_payload(payload: &HookPayload, settings: &HookSettings) -> Result<Self, HookError> {
        let endpoint = payload.server_connection.endpoint()?;
        let client = GraphqlClient::new(&endpoint, settings.request_timeout)?;
        tracing::trace!(url = %client.url(), "GraphQL endpoint resolved");
        Ok(Self::new(Arc::new(client), settings))
    }

    pub async fn run(&self, event: &MarkerTagEvent) -> Result<SyncOutcome, HookError> {
        Ok(self.sync_marker_tags.execute(event).await?)
    }
}

/// Handle one hook invocation.
///
/// Settings are read after the plugin directory's env files are loaded, so
/// a `.env` next to the plugin can switch on all-tags mode.
pub async fn run_hook(payload: &HookPayload) -> Result<SyncOutcome, HookError> {
    let event = payload.marker_event();
    if event.scene_id.is_none() {
        return Ok(SyncOutcome::Skipped);
    }

    settings::load_plugin_env(payload.plugin_dir());
    let settings = HookSettings::from_env();

    App::from_payload(payload, &settings)?.run(&event).await
}
